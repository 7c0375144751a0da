//! Insert, list, and delete endpoints for records.

use crate::{
    ApiError, AppState,
    models::{DeleteResponse, InsertResponse, RecordsQuery, RecordsResponse},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use docbench_store::generate_records;
use log::{debug, error, warn};
use std::time::Instant;

/// Generate one batch of records and insert it, timing the insert.
pub async fn insert_batch(State(state): State<AppState>) -> Result<Json<InsertResponse>, ApiError> {
    let records = generate_records(state.settings.insert_batch_size);
    let started = Instant::now();
    let inserted_count = state.store.insert_many(records).await.inspect_err(|err| {
        error!("batch insert failed: {err}");
    })?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!("inserted batch (count={inserted_count}, elapsed_ms={elapsed_ms})");
    Ok(Json(InsertResponse {
        success: true,
        inserted_count,
        elapsed_ms,
        message: format!("{inserted_count} records inserted in {elapsed_ms}ms"),
    }))
}

/// List records ascending by number. A missing or malformed `limit`
/// falls back to the configured default.
pub async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let fallback = state.settings.default_limit;
    let limit = match query {
        Ok(Query(query)) => parse_limit(query.limit.as_deref(), fallback),
        Err(rejection) => {
            warn!("unreadable query string, using default limit {fallback}: {rejection}");
            fallback
        }
    };
    let found = state.store.find(limit).await.inspect_err(|err| {
        error!("find failed (limit={limit}): {err}");
    })?;
    debug!(
        "listed records (limit={limit}, total={}, showing={})",
        found.total,
        found.records.len()
    );
    Ok(Json(RecordsResponse {
        success: true,
        total: found.total,
        showing: found.records.len(),
        records: found.records,
    }))
}

/// Remove every record.
pub async fn delete_records(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted_count = state.store.delete_all().await.inspect_err(|err| {
        error!("delete failed: {err}");
    })?;
    debug!("deleted records (count={deleted_count})");
    Ok(Json(DeleteResponse {
        success: true,
        deleted_count,
        message: format!("{deleted_count} records deleted"),
    }))
}

/// Positive integers are taken as-is; anything else yields `fallback`.
pub fn parse_limit(raw: Option<&str>, fallback: usize) -> usize {
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().parse::<i64>() {
        Ok(limit) if limit > 0 => usize::try_from(limit).unwrap_or(fallback),
        _ => {
            warn!("invalid limit {raw:?}, using default {fallback}");
            fallback
        }
    }
}
