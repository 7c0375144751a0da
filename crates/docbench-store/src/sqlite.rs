//! SQLite-backed record store.

use crate::error::StoreError;
use crate::model::{FindResult, Record, RecordStats, effective_limit};
use crate::store::RecordStore;
use async_trait::async_trait;
use docbench_config::is_identifier;
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Arc;
use tokio::task;

/// Record store keeping one table per collection.
///
/// The connection is guarded by a mutex; statements run on the blocking pool.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Option<Connection>>>,
    table: String,
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore")
            .field("table", &self.table)
            .field("open", &self.conn.lock().is_some())
            .finish()
    }
}

impl SqliteRecordStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            StoreError::Connection(format!("cannot open {}: {err}", path.display()))
        })?;
        info!("opened sqlite record store (path={})", path.display());
        Self::with_connection(conn, collection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(collection: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| StoreError::Connection(format!("cannot open in-memory db: {err}")))?;
        Self::with_connection(conn, collection)
    }

    fn with_connection(conn: Connection, collection: &str) -> Result<Self, StoreError> {
        if !is_identifier(collection) {
            return Err(StoreError::Connection(format!(
                "invalid collection name: {collection}"
            )));
        }
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {collection} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                number INTEGER NOT NULL,
                text TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                category TEXT NOT NULL,
                value REAL NOT NULL
            )"
        );
        conn.execute_batch(&ddl)
            .map_err(|err| StoreError::Connection(format!("cannot prepare schema: {err}")))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            table: collection.to_string(),
        })
    }

    /// Run `op` against the open connection on the blocking pool, or fail
    /// with `Closed`.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = conn.lock();
            let conn = guard.as_mut().ok_or(StoreError::Closed)?;
            op(conn)
        })
        .await
        .map_err(|err| StoreError::Storage(format!("sqlite task failed: {err}")))?
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize, StoreError> {
        let sql = format!(
            "INSERT INTO {} (number, text, timestamp, category, value) VALUES (?1, ?2, ?3, ?4, ?5)",
            self.table
        );
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(&sql)?;
                for record in &records {
                    let number = i64::try_from(record.number).map_err(|_| {
                        StoreError::Storage(format!("record number out of range: {}", record.number))
                    })?;
                    stmt.execute(params![
                        number,
                        record.text,
                        record.timestamp,
                        record.category,
                        record.value
                    ])?;
                }
            }
            tx.commit()?;
            debug!("sqlite store inserted records (count={})", records.len());
            Ok(records.len())
        })
        .await
    }

    async fn find(&self, limit: usize) -> Result<FindResult, StoreError> {
        let limit = i64::try_from(effective_limit(limit)).unwrap_or(i64::MAX);
        let select = format!(
            "SELECT number, text, timestamp, category, value FROM {} ORDER BY number ASC, id ASC LIMIT ?1",
            self.table
        );
        let count = format!("SELECT COUNT(*) FROM {}", self.table);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(&select)?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(Record {
                    number: row.get::<_, i64>(0)? as u64,
                    text: row.get(1)?,
                    timestamp: row.get(2)?,
                    category: row.get(3)?,
                    value: row.get(4)?,
                })
            })?;
            let records = rows.collect::<Result<Vec<_>, _>>()?;
            let total: i64 = conn.query_row(&count, [], |row| row.get(0))?;
            Ok(FindResult {
                total: total as u64,
                records,
            })
        })
        .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.with_conn(move |conn| {
            let total: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(total as u64)
        })
        .await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {}", self.table);
        self.with_conn(move |conn| {
            let removed = conn.execute(&sql, [])?;
            debug!("sqlite store deleted records (count={removed})");
            Ok(removed as u64)
        })
        .await
    }

    async fn aggregate(&self) -> Result<RecordStats, StoreError> {
        let sql = format!(
            "SELECT AVG(value), MAX(value), MIN(value) FROM {}",
            self.table
        );
        self.with_conn(move |conn| {
            let stats = conn.query_row(&sql, [], |row| {
                Ok(RecordStats {
                    average: row.get(0)?,
                    max: row.get(1)?,
                    min: row.get(2)?,
                })
            })?;
            Ok(stats)
        })
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        let Some(conn) = self.conn.lock().take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, err)| StoreError::Sqlite(err))?;
        info!("closed sqlite record store (table={})", self.table);
        Ok(())
    }
}
