use rusqlite::Connection;
use tasklist_core::db::migrations::latest_version;
use tasklist_core::db::{open_db, open_db_in_memory, DbError};
use tasklist_core::{KeyValueStore, SqliteStore, StoreError, TaskListManager, DEFAULT_STORAGE_KEY};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert!(SqliteStore::try_new(&conn).is_ok());
}

#[test]
fn task_list_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklist.sqlite3");

    let (first_id, written) = {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let mut manager = TaskListManager::load(store);
        let first = manager.add("A").unwrap().unwrap();
        manager.add("B").unwrap();
        manager.toggle(first).unwrap();
        (first, manager.list().clone())
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let manager = TaskListManager::load(store);

    assert_eq!(manager.list(), &written);
    assert!(manager.get(first_id).unwrap().completed);
    let titles: Vec<_> = manager.tasks().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn persisted_value_is_the_plain_json_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let mut manager = TaskListManager::load(&store);
    let id = manager.add("Buy milk").unwrap().unwrap();

    let raw = store.read(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "id": id, "title": "Buy milk", "completed": false }])
    );
}

#[test]
fn corrupt_row_hydrates_empty_and_is_repaired() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES (?1, ?2);",
        [DEFAULT_STORAGE_KEY, "[{\"id\":"],
    )
    .unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let manager = TaskListManager::load(&store);

    assert!(manager.is_empty());
    assert_eq!(
        store.read(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn blank_key_is_rejected_by_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    assert!(matches!(store.read(" "), Err(StoreError::InvalidKey(_))));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

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
}

#[test]
fn opening_database_in_missing_directory_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tasklist.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(&err, DbError::Open { path: failed, .. } if *failed == path));
    assert!(err.to_string().contains("missing"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
