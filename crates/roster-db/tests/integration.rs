use roster_db::{with_transaction, SessionManager, StoreError, StoreSettings};

#[test]
fn session_bootstraps_and_transactions_share_the_store() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("roster.db");
    let manager = SessionManager::new(path.to_str().unwrap(), StoreSettings::default());

    let pool = manager.ensure_session().expect("failed to open session");

    {
        let mut conn = pool.get().expect("failed to get connection");
        let id: Result<i64, StoreError> = with_transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO users (username, email, password_hash) VALUES ('a', 'a@x.com', 'h')",
                [],
            )?;
            Ok(tx.last_insert_rowid())
        });
        assert_eq!(id.expect("insert should commit"), 1);
    }

    // A second pooled connection sees the committed row.
    let first = pool.get().expect("failed to get connection");
    let second = pool.get().expect("failed to get second connection");
    let username: String = second
        .query_row("SELECT username FROM users WHERE id = 1", [], |row| {
            row.get(0)
        })
        .expect("row should be visible");
    assert_eq!(username, "a");
    drop(first);

    let mut stmt = second
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
        .expect("failed to prepare table query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect();
    assert_eq!(tables, vec!["users".to_string()]);
}

#[test]
fn reopening_an_existing_file_keeps_rows() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("roster.db");
    let path = path.to_str().unwrap().to_string();

    {
        let mut manager = SessionManager::new(path.clone(), StoreSettings::default());
        let pool = manager.ensure_session().expect("failed to open session");
        pool.get()
            .expect("failed to get connection")
            .execute(
                "INSERT INTO users (username, email, password_hash) VALUES ('a', 'a@x.com', 'h')",
                [],
            )
            .expect("insert should succeed");
        manager.shutdown();
    }

    let manager = SessionManager::new(path, StoreSettings::default());
    let pool = manager.ensure_session().expect("failed to reopen session");
    let count: i64 = pool
        .get()
        .expect("failed to get connection")
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .expect("should count users");
    assert_eq!(count, 1);
}
