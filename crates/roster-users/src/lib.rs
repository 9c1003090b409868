//! User accounts for Roster.
//!
//! Implements the five user accessors (create, get, list, update, delete)
//! on top of the `roster-db` session and transaction helpers. Every
//! multi-statement accessor runs inside a single transaction, and storage
//! failures come back as a typed [`UserError`].
//!
//! The password hash is opaque to this crate: it is stored and returned
//! exactly as supplied.

mod error;
mod model;
mod queries;
mod store;

pub use error::UserError;
pub use model::{NewUser, User, UserChanges};
pub use store::UserStore;
