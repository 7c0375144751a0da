//! Data access facade over the backing document store.

use crate::error::StoreError;
use crate::file::FileRecordStore;
use crate::memory::MemoryRecordStore;
use crate::model::{FindResult, Record, RecordStats};
use crate::sqlite::SqliteRecordStore;
use async_trait::async_trait;
use docbench_config::{StoreConfig, is_identifier};
use log::info;
use std::sync::Arc;

#[async_trait]
/// Narrow interface over a single record collection.
///
/// A store owns one connection handle, opened by [`connect`] and released by
/// [`RecordStore::close`]. Implementations add no retries or timeouts.
pub trait RecordStore: Send + Sync {
    /// Persist all records. Any failure is reported for the whole batch.
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize, StoreError>;

    /// Read records ascending by `number`, truncated to `limit` (0 means the
    /// default limit), plus the count of every record in the store.
    async fn find(&self, limit: usize) -> Result<FindResult, StoreError>;

    /// Count all records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Remove every record, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Average/min/max of `value`; empty stats when the store is empty.
    async fn aggregate(&self) -> Result<RecordStats, StoreError>;

    /// Release the connection handle.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Open the store named by `config.uri`.
///
/// Supported schemes: `memory://`, `file://<dir>`, `sqlite://<path>` and
/// `sqlite::memory:`.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    if !is_identifier(&config.collection) {
        return Err(StoreError::Connection(format!(
            "invalid collection name: {}",
            config.collection
        )));
    }
    let uri = config.uri.trim();
    let store: Arc<dyn RecordStore> = if uri == "memory://" || uri == "memory:" {
        Arc::new(MemoryRecordStore::new())
    } else if let Some(root) = uri.strip_prefix("file://") {
        Arc::new(FileRecordStore::open(
            root,
            &config.database,
            &config.collection,
        )?)
    } else if uri == "sqlite::memory:" {
        Arc::new(SqliteRecordStore::open_in_memory(&config.collection)?)
    } else if let Some(path) = uri.strip_prefix("sqlite://") {
        Arc::new(SqliteRecordStore::open(path, &config.collection)?)
    } else {
        return Err(StoreError::Connection(format!(
            "unsupported store uri: {uri}"
        )));
    };
    info!(
        "connected to store (uri={}, database={}, collection={})",
        uri, config.database, config.collection
    );
    Ok(store)
}
