use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;
use time::Duration as TimeDuration;
use tower_sessions::session::Id;
use tower_sessions::{Expiry, MemoryStore, Session, SessionStore};

use super::access::Principal;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    InvalidHash(String),
    #[error("password worker failed: {0}")]
    Worker(String),
}

/// Hashes on the blocking pool; Argon2 is too heavy for a runtime worker.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_with_argon2(&password))
        .await
        .map_err(|err| PasswordError::Worker(err.to_string()))?
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_with_argon2(&password, &hash))
        .await
        .map_err(|err| PasswordError::Worker(err.to_string()))?
}

fn hash_with_argon2(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::Hash(err.to_string()))
}

fn verify_with_argon2(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|err| PasswordError::InvalidHash(err.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordError::InvalidHash(err.to_string())),
    }
}

/// Opaque bearer token handed out at login; it carries the session id.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn session_id(&self) -> Option<Id> {
        self.0.parse::<Id>().ok()
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<Id> for SessionToken {
    fn from(id: Id) -> Self {
        Self(id.to_string())
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session failure: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("session store failure: {0}")]
    Store(#[from] tower_sessions::session_store::Error),
    #[error("session store did not assign an id")]
    MissingId,
}

const PRINCIPAL_KEY: &str = "principal";

/// Longest lifetime a session may be configured with.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

/// Bearer sessions kept in a `tower-sessions` memory store. Records carry an
/// expiry; an expired or unknown token resolves as anonymous.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    store: Arc<MemoryStore>,
    expiry: Expiry,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        let secs = ttl.min(MAX_SESSION_TTL).as_secs();
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self::with_expiry(Expiry::OnInactivity(TimeDuration::seconds(secs)))
    }

    pub fn with_expiry(expiry: Expiry) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            expiry,
        }
    }

    fn session(&self, id: Option<Id>) -> Session {
        Session::new(id, self.store.clone(), Some(self.expiry))
    }

    pub async fn issue(&self, principal: Principal) -> Result<SessionToken, SessionError> {
        let session = self.session(None);
        session.insert(PRINCIPAL_KEY, principal).await?;
        session.save().await?;
        session
            .id()
            .map(SessionToken::from)
            .ok_or(SessionError::MissingId)
    }

    pub async fn resolve(&self, token: &SessionToken) -> Result<Option<Principal>, SessionError> {
        let Some(id) = token.session_id() else {
            return Ok(None);
        };
        Ok(self.session(Some(id)).get::<Principal>(PRINCIPAL_KEY).await?)
    }

    /// Returns whether the token named a live session. Lapsed records are
    /// dropped as well.
    pub async fn revoke(&self, token: &SessionToken) -> Result<bool, SessionError> {
        let Some(id) = token.session_id() else {
            return Ok(false);
        };
        let live = self
            .session(Some(id))
            .get::<Principal>(PRINCIPAL_KEY)
            .await?
            .is_some();
        self.store.delete(&id).await?;
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::domain::{Role, UserId};
    use time::OffsetDateTime;

    fn seller() -> Principal {
        Principal {
            user_id: UserId(3),
            role: Role::Seller,
        }
    }

    #[tokio::test]
    async fn hashed_passwords_verify_only_with_the_original() {
        let hash = hash_password("correct horse battery".to_string())
            .await
            .expect("hash succeeds");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery".to_string(), hash.clone())
            .await
            .expect("verifies"));
        assert!(!verify_password("wrong horse".to_string(), hash)
            .await
            .expect("verifies"));
        assert!(matches!(
            verify_password("anything".to_string(), "not-a-phc-string".to_string()).await,
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[tokio::test]
    async fn sessions_resolve_until_revoked() {
        let registry = SessionRegistry::new(Duration::from_secs(600));

        let token = registry.issue(seller()).await.expect("issue");
        assert_eq!(registry.resolve(&token).await.expect("resolve"), Some(seller()));

        assert!(registry.revoke(&token).await.expect("revoke"));
        assert_eq!(registry.resolve(&token).await.expect("resolve"), None);
        assert!(!registry.revoke(&token).await.expect("revoke"));
        assert_eq!(
            registry
                .resolve(&SessionToken::from("never-issued"))
                .await
                .expect("resolve"),
            None
        );
    }

    #[tokio::test]
    async fn expired_sessions_resolve_as_anonymous() {
        let lapsed = OffsetDateTime::now_utc() - TimeDuration::minutes(5);
        let registry = SessionRegistry::with_expiry(Expiry::AtDateTime(lapsed));

        let token = registry.issue(seller()).await.expect("issue");
        assert_eq!(registry.resolve(&token).await.expect("resolve"), None);
        assert!(!registry.revoke(&token).await.expect("revoke"));
    }

    #[tokio::test]
    async fn each_login_gets_its_own_session() {
        let registry = SessionRegistry::new(Duration::from_secs(600));
        let first = registry.issue(seller()).await.expect("issue");
        let second = registry.issue(seller()).await.expect("issue");
        assert_ne!(first, second);

        registry.revoke(&first).await.expect("revoke");
        assert_eq!(registry.resolve(&second).await.expect("resolve"), Some(seller()));
    }

    #[test]
    fn token_debug_output_is_redacted() {
        let token = SessionToken::from("secret-value");
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
        assert_eq!(token.as_str(), "secret-value");
    }
}
