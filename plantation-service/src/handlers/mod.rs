pub mod auth;
pub mod payments;
pub mod pluckers;
pub mod records;
pub mod reports;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::metrics::get_metrics;
use crate::AppState;

/// Liveness probe; does not touch the database.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "plantation-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe; fails when MongoDB cannot be reached.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        ),
    }
}

/// Prometheus metrics in text exposition format.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
