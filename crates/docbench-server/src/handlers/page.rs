//! Static page and liveness endpoints.

use crate::models::HealthResponse;
use axum::{Json, response::Html};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness only; does not touch the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
    })
}
