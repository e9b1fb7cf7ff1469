//! Per-request authorization for mutating and seller-scoped operations.

use serde::{Deserialize, Serialize};

use super::domain::{Property, Role, User, UserId};

/// Identity of the caller as resolved from the session. The gate never looks
/// at identities supplied in request bodies or parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

/// Distinguishes "log in" from "not yours".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(&'static str),
}

pub fn require_authenticated(caller: Option<&Principal>) -> Result<&Principal, AccessDenied> {
    caller.ok_or(AccessDenied::Unauthenticated)
}

pub fn require_seller(caller: Option<&Principal>) -> Result<&Principal, AccessDenied> {
    let principal = require_authenticated(caller)?;
    if principal.is_seller() {
        Ok(principal)
    } else {
        Err(AccessDenied::Forbidden("only sellers can manage listings"))
    }
}

pub fn require_owner<'a>(
    caller: Option<&'a Principal>,
    property: &Property,
) -> Result<&'a Principal, AccessDenied> {
    let principal = require_authenticated(caller)?;
    if principal.user_id == property.seller_id {
        Ok(principal)
    } else {
        Err(AccessDenied::Forbidden("listing belongs to another seller"))
    }
}
