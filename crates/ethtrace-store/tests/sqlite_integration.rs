use std::sync::Arc;

use ethtrace_store::{
    BlockHeight, DynTraceStore, RawActionEntry, RawTraceRow, SqliteTraceStore, StoreConfig,
    StoreError, query_block_rows,
};

fn seed(path: &std::path::Path) {
    let store = SqliteTraceStore::create(path).expect("create for seeding");
    store
        .insert_row(BlockHeight(100), &RawTraceRow::new(1_700_000_000, "0xA", vec![]))
        .expect("row A");
    store
        .insert_row(
            BlockHeight(100),
            &RawTraceRow::new(
                1_700_000_000,
                "0xB",
                vec![
                    RawActionEntry::new("x", "y", "z"),
                    RawActionEntry {
                        action_to: None,
                        action_from: Some("0xcreator".into()),
                        action_input: Some("0x6080".into()),
                    },
                ],
            ),
        )
        .expect("row B");
    store.close().expect("close");
}

#[test]
fn reopened_file_store_serves_seeded_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ethstore.sqlite");
    seed(&path);

    let config = StoreConfig { path: path.clone() };
    let store: DynTraceStore = Arc::new(config.open().expect("reopen"));
    let rows = query_block_rows(store.as_ref(), BlockHeight(100)).expect("query");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].transaction_hash.as_deref(), Some("0xA"));
    assert_eq!(rows[0].traces.as_deref(), Some(&[][..]));
    let actions = rows[1].traces.as_ref().expect("actions");
    assert_eq!(actions[0], RawActionEntry::new("x", "y", "z"));
    assert_eq!(actions[1].action_to, None);
}

#[test]
fn empty_block_yields_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ethstore.sqlite");
    seed(&path);

    let store = SqliteTraceStore::open(&path).unwrap();
    assert!(query_block_rows(&store, BlockHeight(101)).unwrap().is_empty());
}

#[test]
fn corrupt_traces_column_surfaces_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ethstore.sqlite");
    seed(&path);

    let conn = rusqlite_handle(&path);
    conn.execute(
        "INSERT INTO trace (block_number, timestamp, transaction_hash, traces) VALUES (5, 1, '0xC', 'not json')",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteTraceStore::open(&path).unwrap();
    let err = query_block_rows(&store, BlockHeight(5)).unwrap_err();
    assert!(matches!(err, StoreError::Decode { column: "traces", .. }));
}

#[test]
fn config_open_reports_missing_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        path: dir.path().join("missing.sqlite"),
    };

    let err = config.open().unwrap_err();

    assert!(err.to_string().contains("does not exist"));
    assert!(!config.path.exists());
}

fn rusqlite_handle(path: &std::path::Path) -> rusqlite::Connection {
    rusqlite::Connection::open(path).unwrap()
}
