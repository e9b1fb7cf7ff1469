mod accounts;
mod inquiries;
mod listings;

use std::sync::Arc;

use super::access::{AccessDenied, Principal};
use super::auth::{PasswordError, SessionError, SessionRegistry, SessionToken};
use super::store::{MarketplaceStore, StoreError};
use super::validation::ValidationReport;
use crate::config::MarketplaceConfig;

pub use accounts::SessionGrant;
pub(crate) use listings::check_draft;

/// Largest page a client may request from the search endpoint.
pub const MAX_PAGE_SIZE: usize = 100;

/// Service composing the entity store, the access gate, and session lookup.
pub struct MarketplaceService<S> {
    store: Arc<S>,
    sessions: Arc<SessionRegistry>,
    config: MarketplaceConfig,
}

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>, config: MarketplaceConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.session_ttl));
        Self::with_sessions(store, sessions, config)
    }

    pub fn with_sessions(
        store: Arc<S>,
        sessions: Arc<SessionRegistry>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            store,
            sessions,
            config,
        }
    }

    /// Resolves a bearer token to the caller. Missing, unknown or expired
    /// tokens are anonymous callers, not errors.
    pub async fn principal(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Option<Principal>, MarketplaceError> {
        match token {
            Some(token) => Ok(self.sessions.resolve(token).await?),
            None => Ok(None),
        }
    }
}

/// Error raised by the marketplace service; each variant maps to one HTTP
/// status at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    Validation(ValidationReport),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<ValidationReport> for MarketplaceError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}

impl From<AccessDenied> for MarketplaceError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => Self::Unauthenticated,
            AccessDenied::Forbidden(reason) => Self::Forbidden(reason.to_string()),
        }
    }
}

impl From<StoreError> for MarketplaceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UsernameTaken(_) | StoreError::Referenced { .. } => {
                Self::Conflict(error.to_string())
            }
            StoreError::UnknownSeller(_) => Self::Forbidden(error.to_string()),
            StoreError::UnknownProperty(_) => Self::NotFound("property"),
            StoreError::Unavailable(detail) => Self::Storage(detail),
        }
    }
}

impl From<SessionError> for MarketplaceError {
    fn from(error: SessionError) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<PasswordError> for MarketplaceError {
    fn from(error: PasswordError) -> Self {
        Self::Storage(error.to_string())
    }
}
