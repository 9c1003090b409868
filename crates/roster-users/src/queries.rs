//! Raw statements against the `users` table.
//!
//! These take a plain connection so they run unchanged inside or outside a
//! transaction (`Transaction` derefs to `Connection`).

use roster_db::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::{NewUser, User};

const SELECT_COLUMNS: &str = "SELECT id, username, email, password_hash, created_at FROM users";

/// Inserts a user and returns the store-assigned id.
pub(crate) fn insert(conn: &Connection, new_user: &NewUser) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![new_user.username, new_user.email, new_user.password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn select_by_id(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id],
            map_row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub(crate) fn select_all(conn: &Connection) -> Result<Vec<User>, StoreError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
    let rows = stmt.query_map([], map_row_to_user)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

/// Overwrites all three writable fields. Returns the number of rows changed.
pub(crate) fn update_fields(
    conn: &Connection,
    id: i64,
    fields: &NewUser,
) -> Result<usize, StoreError> {
    let count = conn.execute(
        "UPDATE users SET username = ?1, email = ?2, password_hash = ?3 WHERE id = ?4",
        params![fields.username, fields.email, fields.password_hash, id],
    )?;
    Ok(count)
}

/// Returns the number of rows removed.
pub(crate) fn delete_by_id(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let count = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(count)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        roster_db::bootstrap_schema(&conn).expect("bootstrap should succeed");
        conn
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let conn = test_db();
        let first = insert(&conn, &NewUser::new("a", "a@x.com", "h")).expect("insert a");
        let second = insert(&conn, &NewUser::new("b", "b@x.com", "h")).expect("insert b");
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn select_by_id_returns_none_for_unknown_id() {
        let conn = test_db();
        assert_eq!(select_by_id(&conn, 42).expect("query should succeed"), None);
    }

    #[test]
    fn duplicate_email_is_a_constraint_violation() {
        let conn = test_db();
        insert(&conn, &NewUser::new("a", "same@x.com", "h")).expect("first insert");

        let err = insert(&conn, &NewUser::new("b", "same@x.com", "h"))
            .expect_err("duplicate email should fail");
        assert!(err.is_constraint_violation(), "got {err:?}");
    }

    #[test]
    fn update_and_delete_report_affected_rows() {
        let conn = test_db();
        let id = insert(&conn, &NewUser::new("a", "a@x.com", "h")).expect("insert");

        let updated = update_fields(&conn, id, &NewUser::new("a2", "a@x.com", "h"))
            .expect("update should succeed");
        assert_eq!(updated, 1);
        assert_eq!(
            update_fields(&conn, 99, &NewUser::new("z", "z@x.com", "h")).expect("update"),
            0
        );

        assert_eq!(delete_by_id(&conn, id).expect("delete"), 1);
        assert_eq!(delete_by_id(&conn, id).expect("second delete"), 0);
        assert!(select_all(&conn).expect("list").is_empty());
    }
}
