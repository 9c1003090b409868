//! The user accessors.

use roster_db::{with_transaction, DbConnection, SessionManager, StoreError};

use crate::error::UserError;
use crate::model::{NewUser, User, UserChanges};
use crate::queries;

/// Entry point for every user operation.
///
/// Holds the injected [`SessionManager`]; the store is opened on the first
/// accessor call. Accessors are blocking and safe to call from several
/// threads at once. Isolation between concurrent writers is SQLite's own.
pub struct UserStore {
    sessions: SessionManager,
}

impl UserStore {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Releases the underlying pool. Later accessor calls fail with
    /// [`UserError::Unavailable`].
    pub fn shutdown(&mut self) {
        self.sessions.shutdown();
    }

    fn connection(&self) -> Result<DbConnection, UserError> {
        let pool = self.sessions.ensure_session()?;
        let conn = pool.get().map_err(StoreError::from)?;
        Ok(conn)
    }

    /// Inserts a user and returns it as stored.
    ///
    /// # Errors
    ///
    /// [`UserError::AlreadyExists`] if the username or email is taken.
    pub fn create_user(&self, new_user: &NewUser) -> Result<User, UserError> {
        let mut conn = self.connection()?;

        let user = with_transaction(&mut conn, |tx| -> Result<User, UserError> {
            let id = queries::insert(tx, new_user).map_err(|err| {
                UserError::from_write(err, &new_user.username, &new_user.email)
            })?;
            queries::select_by_id(tx, id)?.ok_or(UserError::NotFound(id))
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// # Errors
    ///
    /// [`UserError::NotFound`] if no user has `id`.
    pub fn get_user_by_id(&self, id: i64) -> Result<User, UserError> {
        let conn = self.connection()?;
        queries::select_by_id(&conn, id)?.ok_or(UserError::NotFound(id))
    }

    /// Returns every user ordered by ascending id.
    pub fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        let conn = self.connection()?;
        Ok(queries::select_all(&conn)?)
    }

    /// Applies `changes` to the user with `id` and returns the updated record.
    ///
    /// The current row is read, merged and rewritten within one transaction,
    /// so the merge never sees a concurrent writer's partial state. All
    /// three writable fields are written even when unchanged.
    ///
    /// # Errors
    ///
    /// [`UserError::NotFound`] if no user has `id`;
    /// [`UserError::AlreadyExists`] if the new username or email is taken.
    pub fn update_user(&self, id: i64, changes: &UserChanges) -> Result<User, UserError> {
        let mut conn = self.connection()?;

        let user = with_transaction(&mut conn, |tx| -> Result<User, UserError> {
            let current = queries::select_by_id(tx, id)?.ok_or(UserError::NotFound(id))?;
            let fields = changes.apply_to(&current);

            let count = queries::update_fields(tx, id, &fields)
                .map_err(|err| UserError::from_write(err, &fields.username, &fields.email))?;
            if count == 0 {
                return Err(UserError::NotFound(id));
            }

            queries::select_by_id(tx, id)?.ok_or(UserError::NotFound(id))
        })?;

        tracing::debug!(user_id = id, "user updated");
        Ok(user)
    }

    /// Removes the user with `id` and returns the record as it was.
    ///
    /// # Errors
    ///
    /// [`UserError::NotFound`] if no user has `id`.
    pub fn delete_user(&self, id: i64) -> Result<User, UserError> {
        let mut conn = self.connection()?;

        let snapshot = with_transaction(&mut conn, |tx| -> Result<User, UserError> {
            let snapshot = queries::select_by_id(tx, id)?.ok_or(UserError::NotFound(id))?;
            if queries::delete_by_id(tx, id)? == 0 {
                return Err(UserError::NotFound(id));
            }
            Ok(snapshot)
        })?;

        tracing::info!(user_id = id, username = %snapshot.username, "user deleted");
        Ok(snapshot)
    }
}
