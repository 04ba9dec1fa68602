use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// The authenticated user carried inside a session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

impl AuthUser {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Immutable view of "who is logged in and with what privilege".
///
/// `is_admin` is meaningful only while a user is present. While `loading` is
/// true the snapshot must be treated as anonymous for access decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    pub is_admin: bool,
    pub loading: bool,
}

impl SessionSnapshot {
    /// The startup state: unknown identity, still loading.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            user: None,
            is_admin: false,
            loading: true,
        }
    }

    /// A settled anonymous session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_admin: false,
            loading: false,
        }
    }

    /// A settled authenticated session.
    #[must_use]
    pub fn authenticated(user: AuthUser, is_admin: bool) -> Self {
        Self {
            user: Some(user),
            is_admin,
            loading: false,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Identity of the current user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|user| user.id)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
