//! Record model and query result types shared by all stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Limit applied by `find` when the caller passes zero.
pub const DEFAULT_FIND_LIMIT: usize = 100;

/// Persisted synthetic record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Position within its generated batch, starting at 1.
    pub number: u64,
    /// Human-readable label derived from `number`.
    pub text: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Bucket label, one bucket per 100 numbers.
    pub category: String,
    /// Uniform sample from `[0, 1000)`.
    pub value: f64,
}

impl Record {
    /// Build a record, deriving `text` and `category` from `number`.
    pub fn new(number: u64, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            number,
            text: crate::generator::text_for(number),
            timestamp,
            category: crate::generator::category_for(number),
            value,
        }
    }
}

/// Bounded read plus the unbounded record count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindResult {
    /// Count of all records in the store.
    pub total: u64,
    /// Records sorted ascending by `number`, truncated to the limit.
    pub records: Vec<Record>,
}

/// Aggregate statistics over `Record::value`.
///
/// All fields are `None` for an empty store, which serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

impl RecordStats {
    /// Compute average/min/max in a single pass.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            average: Some(sum / count as f64),
            max: Some(max),
            min: Some(min),
        }
    }

    /// True when no statistics were produced.
    pub fn is_empty(&self) -> bool {
        self.average.is_none() && self.max.is_none() && self.min.is_none()
    }
}

/// Map a requested limit to the one actually applied.
pub fn effective_limit(limit: usize) -> usize {
    if limit == 0 { DEFAULT_FIND_LIMIT } else { limit }
}
