//! Error types for store operations.

/// Errors returned by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or opened.
    #[error("connection error: {0}")]
    Connection(String),
    /// A store operation failed.
    #[error("storage error: {0}")]
    Storage(String),
    /// The handle was used after `close`.
    #[error("store connection is closed")]
    Closed,
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// True when the error happened while establishing the connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}
