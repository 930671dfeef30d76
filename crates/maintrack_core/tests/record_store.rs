use maintrack_core::db::open_db_in_memory;
use maintrack_core::repo::record_store::{
    load_or_default, save, HISTORY_KEY, WORKSHOPS_KEY,
};
use maintrack_core::{HistoryEntry, RecordStore, RepoError, SqliteRecordStore, Workshop};
use rusqlite::Connection;

#[test]
fn missing_key_loads_default() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let workshops: Vec<Workshop> = load_or_default(&store, WORKSHOPS_KEY).unwrap();
    assert!(workshops.is_empty());
    assert!(store.read_blob(WORKSHOPS_KEY).unwrap().is_none());
}

#[test]
fn save_then_load_returns_same_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let workshops = vec![Workshop::new("w1", "Line A"), Workshop::new("w2", "Line B")];
    save(&store, WORKSHOPS_KEY, &workshops).unwrap();

    let loaded: Vec<Workshop> = load_or_default(&store, WORKSHOPS_KEY).unwrap();
    assert_eq!(loaded, workshops);
}

#[test]
fn save_overwrites_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    save(&store, WORKSHOPS_KEY, &vec![Workshop::new("w1", "Old")]).unwrap();
    save(&store, WORKSHOPS_KEY, &vec![Workshop::new("w2", "New")]).unwrap();

    let loaded: Vec<Workshop> = load_or_default(&store, WORKSHOPS_KEY).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "w2");

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn corrupt_blob_recovers_to_default() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    store
        .write_blobs(&[
            (WORKSHOPS_KEY, "{not json".to_string()),
            (HISTORY_KEY, r#"[{"id": 42}]"#.to_string()),
        ])
        .unwrap();

    let workshops: Vec<Workshop> = load_or_default(&store, WORKSHOPS_KEY).unwrap();
    let history: Vec<HistoryEntry> = load_or_default(&store, HISTORY_KEY).unwrap();
    assert!(workshops.is_empty());
    assert!(history.is_empty());
}

#[test]
fn write_blobs_commits_every_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    store
        .write_blobs(&[(WORKSHOPS_KEY, "[]".to_string()), (HISTORY_KEY, "[]".to_string())])
        .unwrap();

    assert_eq!(store.read_blob(WORKSHOPS_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(store.read_blob(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteRecordStore::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}
