use prepgantt_core::db::migrations::latest_version;
use prepgantt_core::db::{open_db, open_db_in_memory, DbError};
use prepgantt_core::keys;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "blobs");
}

#[test]
fn blob_insert_without_timestamp_gets_current_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let before_ms = chrono::Utc::now().timestamp() * 1000;

    conn.execute(
        "INSERT INTO blobs (key, value) VALUES (?1, '[]');",
        [keys::BLOCKS],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM blobs WHERE key = ?1;",
            [keys::BLOCKS],
            |row| row.get(0),
        )
        .unwrap();
    // Seconds resolution, so allow the second of the insert itself.
    assert!(updated_at >= before_ms - 1000, "updated_at {updated_at} is stale");
    assert_eq!(updated_at % 1000, 0);
}

#[test]
fn reopening_database_file_keeps_schema_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prepgantt.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    conn_first
        .execute(
            "INSERT INTO blobs (key, value) VALUES (?1, '[]');",
            [keys::ACTIVE_PLAN],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let value: String = conn_second
        .query_row(
            "SELECT value FROM blobs WHERE key = ?1;",
            [keys::ACTIVE_PLAN],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "[]");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
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
