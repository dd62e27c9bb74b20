//! Current-user contract.
//!
//! The cart itself does not care who is shopping; checkout does. Whatever
//! authentication backend is in use exposes the signed-in user through
//! [`UserSession`].

use serde::{Deserialize, Serialize};

use sanekey_core::UserId;

/// Identity of the signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CurrentUser {
    /// A user known only by ID.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// Source of the current user.
pub trait UserSession {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<CurrentUser>;

    /// Whether a user is signed in.
    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

/// A session whose user is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<CurrentUser>,
}

impl StaticSession {
    /// Session with a signed-in user.
    #[must_use]
    pub const fn signed_in(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// Session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }
}

impl UserSession for StaticSession {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session() {
        assert!(!StaticSession::anonymous().is_signed_in());
    }

    #[test]
    fn test_signed_in_session() {
        let session = StaticSession::signed_in(CurrentUser::new("u-7"));
        assert!(session.is_signed_in());
        assert_eq!(session.current_user().map(|u| u.id), Some(UserId::new("u-7")));
    }
}
