use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use unimatch_shared::clients::db;
use unimatch_shared::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

/// Liveness plus a database probe. The embedding service is not probed; a run
/// that cannot reach it fails with E2001.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let checks = vec![HealthCheck::from_probe("database", db::ping(&state.db))];

    let response = HealthResponse::healthy("unimatch-matching", env!("CARGO_PKG_VERSION"))
        .with_checks(checks);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
