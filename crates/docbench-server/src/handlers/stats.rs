//! Aggregate statistics endpoint.

use crate::{ApiError, AppState, models::StatsResponse};
use axum::{Json, extract::State};
use log::{debug, error};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let total_records = state.store.count().await.inspect_err(|err| {
        error!("count failed: {err}");
    })?;
    let stats = state.store.aggregate().await.inspect_err(|err| {
        error!("aggregate failed: {err}");
    })?;
    debug!("computed stats (total_records={total_records}, empty={})", stats.is_empty());
    Ok(Json(StatsResponse {
        success: true,
        total_records,
        stats,
    }))
}
