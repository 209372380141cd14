//! Access control decisions
//!
//! Pure functions deciding whether an actor may view, list or change the
//! status of user records. Nothing here touches storage; callers fetch the
//! records they need and translate denials into errors themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::user::{User, UserRole};

/// The identity a validated token speaks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub email: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: u64, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Why an operation was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The actor lacks the role or ownership the operation needs
    Forbidden,
    /// A non-admin tried to view their own record while it is blocked
    AccountBlocked,
    /// A non-admin tried to deactivate their own account
    SelfBlock,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::Forbidden => write!(f, "Insufficient permissions"),
            DenyReason::AccountBlocked => {
                write!(f, "Your account is blocked. Contact an administrator.")
            }
            DenyReason::SelfBlock => write!(f, "You cannot block yourself"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts a denial into the matching error
    pub fn into_result(self) -> crate::error::Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(crate::error::GatehouseError::Forbidden(reason)),
        }
    }
}

/// Admins see everyone, blocked or not. Others see only themselves, and only while active.
pub fn can_view_user(actor: &Actor, target: &User) -> Decision {
    if actor.is_admin() {
        return Decision::Allow;
    }
    if actor.id != target.id {
        return Decision::Deny(DenyReason::Forbidden);
    }
    if !target.is_active {
        return Decision::Deny(DenyReason::AccountBlocked);
    }
    Decision::Allow
}

pub fn can_list_users(actor: &Actor) -> Decision {
    if actor.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

/// Decided from the requested id alone, so no record lookup is needed first.
pub fn can_change_status(actor: &Actor, target_id: u64, new_is_active: bool) -> Decision {
    if actor.is_admin() {
        return Decision::Allow;
    }
    // Must precede the ownership check: acting on yourself is otherwise allowed.
    if target_id == actor.id && !new_is_active {
        return Decision::Deny(DenyReason::SelfBlock);
    }
    if target_id != actor.id {
        return Decision::Deny(DenyReason::Forbidden);
    }
    Decision::Allow
}
