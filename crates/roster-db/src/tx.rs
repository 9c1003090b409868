//! Transaction bracketing for multi-statement operations.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::StoreError;

/// Runs `operation` inside a transaction on `conn`.
///
/// The transaction is opened `IMMEDIATE`, taking the write lock up front so
/// that a read followed by a write inside `operation` sees one snapshot and
/// cannot fail on lock upgrade. Contending writers wait out the busy timeout.
///
/// Commits when `operation` succeeds. When it fails, the transaction is
/// rolled back and the original error is returned unchanged; a failing
/// rollback is logged and does not replace it. Failures to begin or commit
/// surface as [`StoreError`].
///
/// Not reentrant: `operation` must not open another transaction on the same
/// connection.
///
/// # Errors
///
/// Returns whatever `operation` returns, or the begin/commit failure.
pub fn with_transaction<T, E, F>(conn: &mut Connection, operation: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<StoreError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(StoreError::from)?;

    match operation(&tx) {
        Ok(value) => {
            tx.commit().map_err(StoreError::from)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum ProbeError {
        Store(StoreError),
        Aborted(&'static str),
    }

    impl From<StoreError> for ProbeError {
        fn from(err: StoreError) -> Self {
            ProbeError::Store(err)
        }
    }

    fn probe_db() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch("CREATE TABLE probe (name TEXT NOT NULL UNIQUE);")
            .expect("should create probe table");
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM probe", [], |row| row.get(0))
            .expect("should count rows")
    }

    #[test]
    fn commits_on_success() {
        let mut conn = probe_db();

        let inserted: Result<usize, ProbeError> = with_transaction(&mut conn, |tx| {
            let n = tx
                .execute("INSERT INTO probe (name) VALUES ('a')", [])
                .map_err(StoreError::from)?;
            Ok(n)
        });

        assert_eq!(inserted.expect("transaction should commit"), 1);
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn rolls_back_and_returns_original_error() {
        let mut conn = probe_db();

        let result: Result<(), ProbeError> = with_transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO probe (name) VALUES ('a')", [])
                .map_err(StoreError::from)?;
            Err(ProbeError::Aborted("stop here"))
        });

        match result {
            Err(ProbeError::Aborted(reason)) => assert_eq!(reason, "stop here"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(count(&conn), 0, "insert should have been rolled back");
    }

    #[test]
    fn store_failures_pass_through_unchanged() {
        let mut conn = probe_db();
        conn.execute("INSERT INTO probe (name) VALUES ('a')", [])
            .expect("seed insert should succeed");

        let result: Result<(), ProbeError> = with_transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO probe (name) VALUES ('b')", [])
                .map_err(StoreError::from)?;
            tx.execute("INSERT INTO probe (name) VALUES ('a')", [])
                .map_err(StoreError::from)?;
            Ok(())
        });

        match result {
            Err(ProbeError::Store(err)) => assert!(err.is_constraint_violation()),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(count(&conn), 1, "partial writes should have been rolled back");
    }

    #[test]
    fn connection_is_reusable_after_rollback() {
        let mut conn = probe_db();

        let _: Result<(), ProbeError> =
            with_transaction(&mut conn, |_tx| Err(ProbeError::Aborted("first")));

        let second: Result<(), ProbeError> = with_transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO probe (name) VALUES ('c')", [])
                .map_err(StoreError::from)?;
            Ok(())
        });

        assert!(second.is_ok());
        assert_eq!(count(&conn), 1);
    }
}
