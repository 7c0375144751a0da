//! Record model, synthetic record generation, and the data access facade
//! over the backing document store.

pub mod error;
pub mod file;
pub mod generator;
pub mod memory;
pub mod model;
pub mod sqlite;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// File-backed store.
pub use file::FileRecordStore;
/// Synthetic record generation.
pub use generator::{category_for, generate_records, generate_records_with, text_for};
/// In-process store.
pub use memory::MemoryRecordStore;
/// Record model and query results.
pub use model::{DEFAULT_FIND_LIMIT, FindResult, Record, RecordStats, effective_limit};
/// SQLite-backed store.
pub use sqlite::SqliteRecordStore;
/// Store interface and connection entry point.
pub use store::{RecordStore, connect};
