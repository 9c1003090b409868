//! Lazily opened, process-wide store session.

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

use crate::error::SessionError;
use crate::pool::{create_pool, DbPool, StoreSettings};
use crate::schema::bootstrap_schema;

/// Owns the store location and the pool opened for it.
///
/// The pool is created on the first call to [`SessionManager::ensure_session`]
/// and reused afterwards. Initialization runs under an initialize-once cell:
/// concurrent first callers block until a single opener finishes, so the
/// schema bootstrap runs once per session. A failed open is not memoized.
pub struct SessionManager {
    path: String,
    settings: StoreSettings,
    pool: OnceCell<DbPool>,
    closed: bool,
    bootstrap_runs: AtomicUsize,
}

impl SessionManager {
    /// Creates a manager for the database at `path` without opening it.
    pub fn new(path: impl Into<String>, settings: StoreSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            pool: OnceCell::new(),
            closed: false,
            bootstrap_runs: AtomicUsize::new(0),
        }
    }

    /// Location of the database this manager opens.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the shared pool, opening and bootstrapping the store on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after [`SessionManager::shutdown`], and
    /// [`SessionError::Open`] or [`SessionError::Bootstrap`] if the store
    /// cannot be brought up.
    pub fn ensure_session(&self) -> Result<&DbPool, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.pool.get_or_try_init(|| self.open())
    }

    fn open(&self) -> Result<DbPool, SessionError> {
        let pool = create_pool(&self.path, self.settings).map_err(|source| SessionError::Open {
            path: self.path.clone(),
            source,
        })?;

        {
            let conn = pool.get().map_err(|source| SessionError::Open {
                path: self.path.clone(),
                source,
            })?;
            bootstrap_schema(&conn).map_err(SessionError::Bootstrap)?;
        }

        self.bootstrap_runs.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            path = %self.path,
            max_connections = pool.max_size(),
            "store session opened"
        );
        Ok(pool)
    }

    /// Whether the pool has been opened and not yet shut down.
    pub fn is_open(&self) -> bool {
        !self.closed && self.pool.get().is_some()
    }

    /// Number of times the schema bootstrap has run for this manager.
    pub fn bootstrap_runs(&self) -> usize {
        self.bootstrap_runs.load(Ordering::SeqCst)
    }

    /// Releases the pool and refuses further sessions.
    ///
    /// Idle connections close when the pool is dropped here; connections
    /// still checked out close when their holders return them.
    pub fn shutdown(&mut self) {
        self.closed = true;
        if let Some(pool) = self.pool.take() {
            let state = pool.state();
            drop(pool);
            tracing::info!(
                path = %self.path,
                connections = state.connections,
                "store session shut down"
            );
        }
    }
}
