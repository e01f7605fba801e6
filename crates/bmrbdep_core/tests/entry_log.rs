use bmrbdep_core::db::migrations::latest_version;
use bmrbdep_core::db::{open_db, open_db_in_memory};
use bmrbdep_core::{ensure_log_exists, update_entire_database, AppConfig, DbError, ErrorClass};
use rusqlite::{Connection, ErrorCode};
use std::path::Path;

fn fixture_config(repo: &Path) -> AppConfig {
    AppConfig::new(repo, repo)
}

#[test]
fn ensure_log_exists_creates_database_file_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    assert!(!config.database_path().exists());

    ensure_log_exists(&config).unwrap();

    assert_eq!(config.database_path(), dir.path().join("depositions.sqlite3"));
    let conn = Connection::open(config.database_path()).unwrap();
    assert_eq!(count_objects(&conn, "table", "entrylog"), 1);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn ensure_log_exists_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    ensure_log_exists(&config).unwrap();
    {
        let conn = Connection::open(config.database_path()).unwrap();
        insert_raw(&conn, "keep-me");
    }
    ensure_log_exists(&config).unwrap();

    let conn = Connection::open(config.database_path()).unwrap();
    assert_eq!(count_objects(&conn, "table", "entrylog"), 1);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM entrylog;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn racing_first_run_creates_exactly_one_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    std::thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| scope.spawn(|| ensure_log_exists(&config)))
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
    });

    let conn = Connection::open(config.database_path()).unwrap();
    assert_eq!(count_objects(&conn, "table", "entrylog"), 1);
}

#[test]
fn restart_id_uniqueness_is_enforced_by_one_constraint() {
    let conn = open_db_in_memory().unwrap();

    insert_raw(&conn, "token-1");
    let err = conn
        .execute(
            "INSERT INTO entrylog (restart_id) VALUES (?1);",
            ["token-1"],
        )
        .unwrap_err();
    assert_eq!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation));

    // The column constraint's autoindex is the only index on the table.
    let explicit_indexes: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'index' AND tbl_name = 'entrylog' AND sql IS NOT NULL;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(explicit_indexes, 0);
}

#[test]
fn distinct_restart_ids_get_increasing_ids() {
    let conn = open_db_in_memory().unwrap();

    let first = insert_raw(&conn, "a");
    let second = insert_raw(&conn, "b");
    conn.execute("DELETE FROM entrylog WHERE bmrbig_id = ?1;", [second])
        .unwrap();
    let third = insert_raw(&conn, "c");

    assert!(first < second);
    assert!(second < third, "AUTOINCREMENT ids must not be reused");
}

#[test]
fn legacy_database_without_version_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    {
        let conn = Connection::open(config.database_path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE entrylog (bmrbig_id INTEGER PRIMARY KEY AUTOINCREMENT,
                                    restart_id TEXT UNIQUE,
                                    author_email TEXT,
                                    submission_date DATE,
                                    release_date DATE,
                                    contact_person1 TEXT,
                                    title TEXT,
                                    bmrb_id TEXT,
                                    pdb_id TEXT,
                                    publication_doi TEXT);
             CREATE INDEX restart_ids on entrylog (restart_id);
             INSERT INTO entrylog (restart_id) VALUES ('legacy');",
        )
        .unwrap();
    }

    ensure_log_exists(&config).unwrap();

    let conn = open_db(config.database_path()).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let restart_id: String = conn
        .query_row("SELECT restart_id FROM entrylog;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(restart_id, "legacy");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    {
        let conn = Connection::open(config.database_path()).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    }

    let err = ensure_log_exists(&config).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_repo_path_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir.path().join("does-not-exist"));

    let err = ensure_log_exists(&config).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
    assert_eq!(err.class(), ErrorClass::Fatal);
}

#[test]
fn update_entire_database_reports_not_implemented() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    let err = update_entire_database(&config).unwrap_err();
    assert!(matches!(err, DbError::NotImplemented("update_entire_database")));
    assert_eq!(err.class(), ErrorClass::Server);
}

fn insert_raw(conn: &Connection, restart_id: &str) -> i64 {
    conn.execute(
        "INSERT INTO entrylog (restart_id, author_email) VALUES (?1, 'author@example.org');",
        [restart_id],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn count_objects(conn: &Connection, kind: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2;",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
