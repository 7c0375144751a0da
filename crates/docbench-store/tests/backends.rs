//! Contract tests shared by every record store backend.

use docbench_config::StoreConfig;
use docbench_store::{
    DEFAULT_FIND_LIMIT, FileRecordStore, MemoryRecordStore, Record, RecordStore,
    SqliteRecordStore, StoreError, connect, generate_records,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

/// Every backend, each paired with the temp dir it lives in.
fn backends() -> Vec<(&'static str, Arc<dyn RecordStore>, TempDir)> {
    let memory_dir = TempDir::new().expect("tmp");
    let file_dir = TempDir::new().expect("tmp");
    let sqlite_dir = TempDir::new().expect("tmp");
    let file = FileRecordStore::open(file_dir.path(), "bench", "records").expect("file store");
    let sqlite = SqliteRecordStore::open(sqlite_dir.path().join("bench.db"), "records")
        .expect("sqlite store");
    vec![
        ("memory", Arc::new(MemoryRecordStore::new()), memory_dir),
        ("file", Arc::new(file), file_dir),
        ("sqlite", Arc::new(sqlite), sqlite_dir),
    ]
}

fn numbers(records: &[Record]) -> Vec<u64> {
    records.iter().map(|record| record.number).collect()
}

#[tokio::test]
async fn insert_then_find_returns_sorted_records() {
    for (name, store, _dir) in backends() {
        let batch = generate_records(250);
        let inserted = store.insert_many(batch.clone()).await.expect("insert");
        assert_eq!(inserted, 250, "{name}");

        let found = store.find(1_000).await.expect("find");
        assert_eq!(found.total, 250, "{name}");
        assert_eq!(numbers(&found.records), (1..=250).collect::<Vec<_>>(), "{name}");
        assert_eq!(found.records[0], batch[0], "{name}");
    }
}

#[tokio::test]
async fn find_truncates_but_counts_everything() {
    for (name, store, _dir) in backends() {
        store.insert_many(generate_records(30)).await.expect("insert");
        store.insert_many(generate_records(30)).await.expect("insert");

        let found = store.find(5).await.expect("find");
        assert_eq!(found.total, 60, "{name}");
        assert_eq!(found.records.len(), 5, "{name}");
        assert_eq!(numbers(&found.records), vec![1, 1, 2, 2, 3], "{name}");
        assert!(found.total >= found.records.len() as u64, "{name}");
    }
}

#[tokio::test]
async fn zero_limit_uses_default() {
    for (name, store, _dir) in backends() {
        store.insert_many(generate_records(150)).await.expect("insert");
        let found = store.find(0).await.expect("find");
        assert_eq!(found.records.len(), DEFAULT_FIND_LIMIT, "{name}");
        assert_eq!(found.total, 150, "{name}");
    }
}

#[tokio::test]
async fn delete_all_empties_the_store() {
    for (name, store, _dir) in backends() {
        store.insert_many(generate_records(42)).await.expect("insert");
        assert_eq!(store.delete_all().await.expect("delete"), 42, "{name}");
        assert_eq!(store.count().await.expect("count"), 0, "{name}");
        assert!(store.aggregate().await.expect("stats").is_empty(), "{name}");
        assert_eq!(store.delete_all().await.expect("delete"), 0, "{name}");
    }
}

#[tokio::test]
async fn aggregate_matches_inserted_values() {
    for (name, store, _dir) in backends() {
        let batch = generate_records(500);
        let expected_min = batch.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
        let expected_max = batch.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
        let expected_avg = batch.iter().map(|r| r.value).sum::<f64>() / batch.len() as f64;
        store.insert_many(batch).await.expect("insert");

        let stats = store.aggregate().await.expect("stats");
        let min = stats.min.expect("min");
        let max = stats.max.expect("max");
        let average = stats.average.expect("average");
        assert!((min - expected_min).abs() < 1e-9, "{name}");
        assert!((max - expected_max).abs() < 1e-9, "{name}");
        assert!((average - expected_avg).abs() < 1e-6, "{name}");
        assert!(min <= average + 1e-9 && average <= max + 1e-9, "{name}");
    }
}

#[tokio::test]
async fn empty_insert_is_a_no_op() {
    for (name, store, _dir) in backends() {
        assert_eq!(store.insert_many(Vec::new()).await.expect("insert"), 0, "{name}");
        assert_eq!(store.count().await.expect("count"), 0, "{name}");
    }
}

#[tokio::test]
async fn operations_fail_after_close() {
    for (name, store, _dir) in backends() {
        store.close().await.expect("close");
        let err = store.count().await.expect_err("closed");
        assert!(matches!(err, StoreError::Closed), "{name}: {err}");
        store.close().await.expect("second close is harmless");
    }
}

/// Inserts and deletes racing on a multi-threaded runtime must all succeed,
/// and the final count must equal everything inserted minus everything
/// reported deleted.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_inserts_and_deletes_stay_consistent() {
    for (name, store, _dir) in backends() {
        let mut tasks = Vec::new();
        for i in 0..200 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                if i % 4 == 0 {
                    store.delete_all().await.map(|removed| -(removed as i64))
                } else {
                    store
                        .insert_many(generate_records(5))
                        .await
                        .map(|inserted| inserted as i64)
                }
            }));
        }

        let mut net = 0i64;
        for task in tasks {
            net += task.await.expect("join").expect(name);
        }
        let count = store.count().await.expect("count");
        assert_eq!(count as i64, net, "{name}");
    }
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let dir = TempDir::new().expect("tmp");
    let uri = format!("file://{}", dir.path().display());
    let store = connect(&StoreConfig::with_uri(&uri)).expect("connect");
    store.insert_many(generate_records(12)).await.expect("insert");
    store.close().await.expect("close");

    let reopened = connect(&StoreConfig::with_uri(&uri)).expect("reconnect");
    assert_eq!(reopened.count().await.expect("count"), 12);
}

#[tokio::test]
async fn sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().expect("tmp");
    let uri = format!("sqlite://{}", dir.path().join("bench.db").display());
    let store = connect(&StoreConfig::with_uri(&uri)).expect("connect");
    store.insert_many(generate_records(12)).await.expect("insert");
    store.close().await.expect("close");

    let reopened = connect(&StoreConfig::with_uri(&uri)).expect("reconnect");
    let found = reopened.find(3).await.expect("find");
    assert_eq!(found.total, 12);
    assert_eq!(found.records[2].text, "Record number 3");
}

#[tokio::test]
async fn connect_selects_backend_by_scheme() {
    for uri in ["memory://", "sqlite::memory:"] {
        let store = connect(&StoreConfig::with_uri(uri)).expect("connect");
        store.insert_many(generate_records(3)).await.expect("insert");
        assert_eq!(store.count().await.expect("count"), 3, "{uri}");
    }
}

#[test]
fn unreachable_sqlite_path_is_a_connection_error() {
    let dir = TempDir::new().expect("tmp");
    let uri = format!(
        "sqlite://{}",
        dir.path().join("missing").join("nested").join("bench.db").display()
    );
    let err = connect(&StoreConfig::with_uri(uri)).err().expect("error");
    assert!(err.is_connection(), "{err}");
}
