use notebook_core::db::schema::SCHEMA_VERSION;
use notebook_core::db::{open_db, open_db_in_memory, open_db_read_only, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "records");
    assert_table_exists(&conn, "record_labels");
}

#[test]
fn opening_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), SCHEMA_VERSION);
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), SCHEMA_VERSION);
    assert_table_exists(&second, "records");
}

#[test]
fn open_db_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 999,
            ..
        }
    ));
}

#[test]
fn read_only_open_requires_initialized_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE unrelated (id INTEGER);").unwrap();
    drop(conn);

    let err = open_db_read_only(&path).unwrap_err();
    assert!(matches!(err, DbError::UninitializedSchema));
}

#[test]
fn read_only_open_accepts_current_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");
    drop(open_db(&path).unwrap());

    let conn = open_db_read_only(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert!(conn
        .execute("INSERT INTO records (position, name, text) VALUES (0, 'x', '');", [])
        .is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
