//! Error types for the storage layer.

use thiserror::Error;

/// A storage failure, classified at the SQLite boundary.
///
/// Uniqueness and other constraint failures are separated from every other
/// database failure so that callers can remap them without inspecting
/// SQLite result codes themselves.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would have violated a table constraint (e.g. `UNIQUE`).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other SQLite failure.
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    /// No pooled connection could be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl StoreError {
    /// Returns `true` if this failure is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let Some(message) = constraint_message(&err) {
            return StoreError::ConstraintViolation(message);
        }
        StoreError::Database(err)
    }
}

fn constraint_message(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == rusqlite::ffi::ErrorCode::ConstraintViolation =>
        {
            Some(message.clone().unwrap_or_else(|| code.to_string()))
        }
        _ => None,
    }
}

/// Errors raised while opening or bootstrapping the store.
///
/// Any of these leaves the store unavailable until the underlying medium is
/// repaired; the session manager does not memoize failures, so the next
/// call retries.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The database file could not be opened or the pool could not be built.
    #[error("failed to open store at '{path}': {source}")]
    Open {
        /// Location of the database.
        path: String,
        /// The underlying pool error.
        source: r2d2::Error,
    },

    /// The idempotent schema bootstrap failed.
    #[error("schema bootstrap failed: {0}")]
    Bootstrap(rusqlite::Error),

    /// The session was shut down and can no longer hand out connections.
    #[error("store session has been shut down")]
    Closed,
}
