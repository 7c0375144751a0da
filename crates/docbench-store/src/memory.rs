//! In-process record store.

use crate::error::StoreError;
use crate::model::{FindResult, Record, RecordStats, effective_limit};
use crate::store::RecordStore;
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Record store held entirely in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<Record>>,
    closed: AtomicBool,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize, StoreError> {
        self.ensure_open()?;
        let inserted = records.len();
        self.records.write().extend(records);
        debug!("memory store inserted records (count={inserted})");
        Ok(inserted)
    }

    async fn find(&self, limit: usize) -> Result<FindResult, StoreError> {
        self.ensure_open()?;
        let mut records: Vec<Record> = self.records.read().iter().cloned().collect();
        let total = records.len() as u64;
        records.sort_by_key(|record| record.number);
        records.truncate(effective_limit(limit));
        Ok(FindResult { total, records })
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_open()?;
        Ok(self.records.read().len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let removed = std::mem::take(&mut *self.records.write()).len() as u64;
        debug!("memory store deleted records (count={removed})");
        Ok(removed)
    }

    async fn aggregate(&self) -> Result<RecordStats, StoreError> {
        self.ensure_open()?;
        Ok(RecordStats::from_values(
            self.records.read().iter().map(|record| record.value),
        ))
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
