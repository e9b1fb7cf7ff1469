use super::domain::{
    NewInquiry, NewUser, Property, PropertyDraft, PropertyId, PropertyInquiry, PropertyUpdate,
    User, UserId,
};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Lookups report absence through `Ok(None)` / `Ok(false)`; errors are reserved
/// for broken invariants and storage failures.
pub trait MarketplaceStore: Send + Sync {
    fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn create_property(&self, seller: UserId, draft: PropertyDraft)
        -> Result<Property, StoreError>;
    fn property(&self, id: PropertyId) -> Result<Option<Property>, StoreError>;
    fn properties(&self) -> Result<Vec<Property>, StoreError>;
    fn properties_by_seller(&self, seller: UserId) -> Result<Vec<Property>, StoreError>;
    fn update_property(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Option<Property>, StoreError>;
    fn delete_property(&self, id: PropertyId) -> Result<bool, StoreError>;

    fn create_inquiry(&self, inquiry: NewInquiry) -> Result<PropertyInquiry, StoreError>;
    fn inquiries_for_property(&self, id: PropertyId)
        -> Result<Vec<PropertyInquiry>, StoreError>;
    fn inquiries_for_seller(&self, seller: UserId) -> Result<Vec<PropertyInquiry>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("user {0} is not a registered seller")]
    UnknownSeller(UserId),
    #[error("property {0} does not exist")]
    UnknownProperty(PropertyId),
    #[error("property {id} still has {inquiries} inquiries")]
    Referenced { id: PropertyId, inquiries: usize },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
