use serde::{Deserialize, Serialize};

/// A stored user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Store-assigned id. Never reused after deletion.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Pre-hashed credential, stored verbatim.
    pub password_hash: String,
    /// Insertion timestamp assigned by the store (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

/// Fields supplied by the caller when creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Partial update of a user. `None` fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }

    /// Resolves the full set of writable fields against `current`.
    pub(crate) fn apply_to(&self, current: &User) -> NewUser {
        NewUser {
            username: self
                .username
                .clone()
                .unwrap_or_else(|| current.username.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            password_hash: self
                .password_hash
                .clone()
                .unwrap_or_else(|| current.password_hash.clone()),
        }
    }
}
