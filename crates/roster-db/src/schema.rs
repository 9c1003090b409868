//! Idempotent schema bootstrap.
//!
//! The store holds a single `users` table. `AUTOINCREMENT` keeps SQLite from
//! handing out the id of a deleted row again.

use rusqlite::Connection;

const USERS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);";

/// Creates the `users` table if it does not exist yet.
///
/// Safe to run any number of times against the same database.
///
/// # Errors
///
/// Returns the SQLite error if the statement cannot be executed.
pub fn bootstrap_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(USERS_TABLE)
}
