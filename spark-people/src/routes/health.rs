use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use spark_shared::{HealthCheck, HealthResponse, HealthStatus};
use std::sync::Arc;

use crate::AppState;

/// Health check that probes the backing store.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let storage = match state.directory.ping() {
        Ok(()) => HealthCheck {
            name: "storage".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => HealthCheck {
            name: "storage".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
    };

    let response = HealthResponse::healthy("spark-people", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![storage]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
