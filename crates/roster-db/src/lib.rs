//! Storage layer for Roster.
//!
//! Provides the SQLite connection pool (via `r2d2`), the one-time schema
//! bootstrap, the session manager that memoizes the pool for the lifetime
//! of the process, and the transaction wrapper used by every write path.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process is required and
//!   concurrent readers can proceed alongside a single writer.
//! - **Injected session manager**: the pool is opened lazily by an explicitly
//!   constructed [`SessionManager`] guarded by an initialize-once cell, so
//!   concurrent first callers never bootstrap twice.
//! - **Tagged storage errors**: SQLite failures are classified once, at this
//!   boundary, into [`StoreError::ConstraintViolation`] or a generic
//!   database failure. Callers match on the tag instead of error codes.

mod error;
mod pool;
mod schema;
mod session;
mod tx;

pub use error::{SessionError, StoreError};
pub use pool::{create_pool, DbConnection, DbPool, StoreSettings};
pub use schema::bootstrap_schema;
pub use session::SessionManager;
pub use tx::with_transaction;
