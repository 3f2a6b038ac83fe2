use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::router::AdventState;

/// GET /api/health -> 200 while healthy or degraded, 503 when unhealthy.
pub async fn health_handler(State(state): State<AdventState>) -> Response {
    let report = state.health.run().await;
    info!(status = ?report.status, "health check completed");

    let code = if report.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report)).into_response()
}
