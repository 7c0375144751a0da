//! File-backed record store keeping one JSONL file per collection.

use crate::error::StoreError;
use crate::model::{FindResult, Record, RecordStats, effective_limit};
use crate::store::RecordStore;
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// File-backed store at `<root>/<database>/<collection>.jsonl`.
///
/// Every operation holds the path lock from first read to last write and
/// runs on the blocking pool.
#[derive(Debug)]
pub struct FileRecordStore {
    /// Collection file; `None` once closed.
    path: Arc<Mutex<Option<PathBuf>>>,
}

impl FileRecordStore {
    /// Open (creating if needed) the collection file under `root`.
    pub fn open(
        root: impl AsRef<Path>,
        database: &str,
        collection: &str,
    ) -> Result<Self, StoreError> {
        let dir = root.as_ref().join(database);
        std::fs::create_dir_all(&dir).map_err(|err| {
            StoreError::Connection(format!("cannot open {}: {err}", dir.display()))
        })?;
        let path = dir.join(format!("{collection}.jsonl"));
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                StoreError::Connection(format!("cannot open {}: {err}", path.display()))
            })?;
        info!("initialized file record store (path={})", path.display());
        Ok(Self {
            path: Arc::new(Mutex::new(Some(path))),
        })
    }

    /// Run `op` on the blocking pool with the collection path locked.
    async fn with_path<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        task::spawn_blocking(move || {
            let guard = path.lock();
            let path = guard.as_deref().ok_or(StoreError::Closed)?;
            op(path)
        })
        .await
        .map_err(|err| StoreError::Storage(format!("file store task failed: {err}")))?
    }

    /// Load all records in insertion order.
    fn load_records(path: &Path) -> Result<Vec<Record>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    /// Rewrite the collection atomically.
    fn write_records(path: &Path, records: &[Record]) -> Result<(), StoreError> {
        let temp_path = path.with_extension("jsonl.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for record in records {
                let line = serde_json::to_string(record)?;
                writeln!(file, "{line}")?;
            }
        }
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    /// Serialize the whole batch before touching the file, then append it
    /// with a single write.
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize, StoreError> {
        let mut buffer = String::new();
        for record in &records {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }
        let count = records.len();
        self.with_path(move |path| {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(buffer.as_bytes())?;
            debug!(
                "file store appended records (path={}, count={})",
                path.display(),
                count
            );
            Ok(count)
        })
        .await
    }

    async fn find(&self, limit: usize) -> Result<FindResult, StoreError> {
        self.with_path(move |path| {
            let mut records = Self::load_records(path)?;
            let total = records.len() as u64;
            records.sort_by_key(|record| record.number);
            records.truncate(effective_limit(limit));
            Ok(FindResult { total, records })
        })
        .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.with_path(|path| Ok(Self::load_records(path)?.len() as u64))
            .await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.with_path(|path| {
            let removed = Self::load_records(path)?.len() as u64;
            Self::write_records(path, &[])?;
            debug!(
                "file store cleared collection (path={}, removed={})",
                path.display(),
                removed
            );
            Ok(removed)
        })
        .await
    }

    async fn aggregate(&self) -> Result<RecordStats, StoreError> {
        self.with_path(|path| {
            let records = Self::load_records(path)?;
            Ok(RecordStats::from_values(
                records.iter().map(|record| record.value),
            ))
        })
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        if let Some(path) = self.path.lock().take() {
            info!("closed file record store (path={})", path.display());
        }
        Ok(())
    }
}
