use roster_db::{SessionError, StoreError};
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// No user has the requested id.
    #[error("user not found: {0}")]
    NotFound(i64),

    /// The username or email is already taken by another user.
    #[error("user with username '{username}' or email '{email}' already exists")]
    AlreadyExists { username: String, email: String },

    /// Any other storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store could not be opened, bootstrapped, or was shut down.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] SessionError),
}

impl UserError {
    /// Remaps a constraint violation on a write of `username`/`email` to
    /// [`UserError::AlreadyExists`]; every other failure becomes
    /// [`UserError::Store`].
    pub(crate) fn from_write(err: StoreError, username: &str, email: &str) -> Self {
        match err {
            StoreError::ConstraintViolation(reason) => {
                tracing::debug!(%reason, username, email, "uniqueness constraint rejected write");
                UserError::AlreadyExists {
                    username: username.to_string(),
                    email: email.to_string(),
                }
            }
            other => UserError::Store(other),
        }
    }
}
