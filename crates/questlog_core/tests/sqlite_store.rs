mod common;

use common::clock_on;
use questlog_core::db::migrations::latest_version;
use questlog_core::db::{open_db, open_db_in_memory, DbError};
use questlog_core::{KeyValueStore, SqliteStore, StoreError, TaskFilter, TrackerService};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqliteStore::open(&path).err().unwrap();
    assert!(matches!(err, StoreError::Db(DbError::UnsupportedSchemaVersion { .. })));
}

#[test]
fn save_overwrites_and_load_reads_back() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.load("points").unwrap(), None);

    store.save("points", "10").unwrap();
    store.save("points", "30").unwrap();
    assert_eq!(store.load("points").unwrap().as_deref(), Some("30"));

    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn tracker_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questlog.sqlite3");
    let clock = clock_on(2026, 10, 14);

    let (tasks, progression) = {
        let mut tracker = TrackerService::load(SqliteStore::open(&path).unwrap(), &clock);
        tracker.add_task("water plants");
        let report = tracker.add_task("call mom");
        let id = match &report.events[0] {
            questlog_core::CoreEvent::TaskAdded { id } => id.clone(),
            other => panic!("unexpected event: {other:?}"),
        };
        tracker.toggle_task(&id).unwrap();
        (tracker.tasks(TaskFilter::All), tracker.progression().clone())
    };

    let reopened = TrackerService::load(SqliteStore::open(&path).unwrap(), &clock);
    assert_eq!(reopened.tasks(TaskFilter::All), tasks);
    assert_eq!(reopened.progression(), &progression);
    assert!(reopened.notice().is_none());
    assert_eq!(reopened.snapshot().summary.unlocked_achievements, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
