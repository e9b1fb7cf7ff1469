//! Listings, buyer inquiries, and seller self-service.
//!
//! The service is generic over [`store::MarketplaceStore`] so handlers and
//! tests can run against any store; [`memory::InMemoryMarketplaceStore`] is the
//! process-lifetime implementation used by the API binary.

pub mod access;
pub mod auth;
pub mod domain;
pub mod import;
pub mod memory;
pub mod router;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use access::{AccessDenied, Principal};
pub use auth::{SessionRegistry, SessionToken};
pub use domain::{
    Credentials, InquiryId, InquirySubmission, NewInquiry, NewUser, Property, PropertyDraft,
    PropertyId, PropertyInquiry, PropertyStatus, PropertyUpdate, Registration, Role, User, UserId,
};
pub use import::{ListingImportError, ListingImporter};
pub use memory::InMemoryMarketplaceStore;
pub use router::marketplace_router;
pub use search::{Page, PriceRange, PropertyBrowser, PropertyQuery, SortKey, Threshold};
pub use service::{MarketplaceError, MarketplaceService, SessionGrant};
pub use store::{MarketplaceStore, StoreError};
pub use validation::{FieldError, ValidationReport};
