//! Synthetic record generation.

use crate::model::Record;
use chrono::Utc;
use rand::Rng;

/// Numbers per category bucket.
const CATEGORY_BUCKET: u64 = 100;
/// Exclusive upper bound for sampled values.
const VALUE_UPPER_BOUND: f64 = 1000.0;

/// Label embedding the record number.
pub fn text_for(number: u64) -> String {
    format!("Record number {number}")
}

/// Category bucket for a record number (1..=100 -> "Category 1", ...).
pub fn category_for(number: u64) -> String {
    let bucket = number.saturating_sub(1) / CATEGORY_BUCKET + 1;
    format!("Category {bucket}")
}

/// Generate `count` records numbered `1..=count` using the thread RNG.
pub fn generate_records(count: usize) -> Vec<Record> {
    generate_records_with(count, &mut rand::rng())
}

/// Generate `count` records numbered `1..=count` using the provided RNG.
///
/// All records in a batch share one timestamp taken at generation time.
pub fn generate_records_with<R: Rng>(count: usize, rng: &mut R) -> Vec<Record> {
    let timestamp = Utc::now();
    (1..=count as u64)
        .map(|number| Record::new(number, rng.random_range(0.0..VALUE_UPPER_BOUND), timestamp))
        .collect()
}
