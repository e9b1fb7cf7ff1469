use serde::Serialize;
use tracing::info;

use super::{MarketplaceError, MarketplaceService};
use crate::marketplace::access::{require_authenticated, Principal};
use crate::marketplace::auth::{hash_password, verify_password, SessionToken};
use crate::marketplace::domain::{Credentials, NewUser, Registration, User};
use crate::marketplace::store::MarketplaceStore;
use crate::marketplace::validation::validate;

/// Account plus the bearer token that now authenticates it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionGrant {
    pub user: User,
    pub token: SessionToken,
}

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore + 'static,
{
    /// Create an account and sign it in.
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<SessionGrant, MarketplaceError> {
        let mut report = validate(&registration).err().unwrap_or_default();
        report.require_not_blank("username", &registration.username, "username is required");
        report.require_not_blank("name", &registration.name, "name is required");
        report.into_result()?;

        let password_hash = hash_password(registration.password).await?;
        let user = self.store.create_user(NewUser {
            username: registration.username.trim().to_string(),
            password_hash,
            name: registration.name.trim().to_string(),
            email: registration.email.trim().to_string(),
            role: registration.role,
        })?;

        info!(user_id = %user.id, role = user.role.label(), "account registered");
        self.open_session(user).await
    }

    pub async fn login(&self, credentials: Credentials) -> Result<SessionGrant, MarketplaceError> {
        let user = self
            .store
            .user_by_username(credentials.username.trim())?
            .ok_or(MarketplaceError::Unauthenticated)?;

        if !verify_password(credentials.password, user.password_hash.clone()).await? {
            return Err(MarketplaceError::Unauthenticated);
        }

        self.open_session(user).await
    }

    pub async fn logout(&self, token: &SessionToken) -> Result<(), MarketplaceError> {
        self.sessions.revoke(token).await?;
        Ok(())
    }

    /// Issue a fresh session for an account that is already verified.
    pub async fn open_session(&self, user: User) -> Result<SessionGrant, MarketplaceError> {
        let token = self.sessions.issue(Principal::from(&user)).await?;
        Ok(SessionGrant { user, token })
    }

    pub fn current_user(&self, caller: Option<&Principal>) -> Result<User, MarketplaceError> {
        let principal = require_authenticated(caller)?;
        self.store
            .user(principal.user_id)?
            .ok_or(MarketplaceError::NotFound("user"))
    }
}
