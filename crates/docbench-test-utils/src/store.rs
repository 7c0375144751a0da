use async_trait::async_trait;
use docbench_store::{
    FindResult, MemoryRecordStore, Record, RecordStats, RecordStore, StoreError, generate_records,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Store whose every operation fails with a storage error.
#[derive(Clone, Debug)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Storage(self.message.clone()))
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("store unavailable")
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert_many(&self, _records: Vec<Record>) -> Result<usize, StoreError> {
        self.fail()
    }

    async fn find(&self, _limit: usize) -> Result<FindResult, StoreError> {
        self.fail()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn aggregate(&self) -> Result<RecordStats, StoreError> {
        self.fail()
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Memory store wrapper that remembers the limits passed to `find`
/// and how many times `close` was called.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryRecordStore,
    limits: Mutex<Vec<usize>>,
    closes: Mutex<usize>,
    insert_failure: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording store whose `insert_many` fails with a storage error.
    pub fn failing_inserts(message: impl Into<String>) -> Self {
        Self {
            insert_failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn limits(&self) -> Vec<usize> {
        self.limits.lock().clone()
    }

    pub fn close_calls(&self) -> usize {
        *self.closes.lock()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize, StoreError> {
        if let Some(message) = &self.insert_failure {
            return Err(StoreError::Storage(message.clone()));
        }
        self.inner.insert_many(records).await
    }

    async fn find(&self, limit: usize) -> Result<FindResult, StoreError> {
        self.limits.lock().push(limit);
        self.inner.find(limit).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.inner.delete_all().await
    }

    async fn aggregate(&self) -> Result<RecordStats, StoreError> {
        self.inner.aggregate().await
    }

    async fn close(&self) -> Result<(), StoreError> {
        *self.closes.lock() += 1;
        self.inner.close().await
    }
}

/// Memory store pre-populated with `count` generated records.
pub async fn seeded_memory_store(count: usize) -> Arc<MemoryRecordStore> {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .insert_many(generate_records(count))
        .await
        .expect("seed memory store");
    store
}
