//! Response envelopes for the HTTP endpoints.

use docbench_store::{Record, RecordStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub success: bool,
    pub inserted_count: usize,
    pub elapsed_ms: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub success: bool,
    /// Count of all records in the store.
    pub total: u64,
    /// Number of records in this response.
    pub showing: usize,
    pub records: Vec<Record>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    /// Kept raw so malformed values can fall back to the default.
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub total_records: u64,
    pub stats: RecordStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
