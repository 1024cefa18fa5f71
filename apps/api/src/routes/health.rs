//! Health check HTTP route handlers
//!
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/live` - Kubernetes-style liveness probe
//! - `GET /health/ready` - Readiness check (pings the store)

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::time::Instant;

use crate::store::Store;

/// Shared state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub store: Store,
}

impl HealthState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Status reported by the readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Readiness probe body
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: ServiceStatus,
    /// Backend name (`postgres` or `memory`)
    pub store: &'static str,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Simple health check - always returns OK if the server is running
async fn simple_health() -> &'static str {
    "OK"
}

/// Liveness probe for Kubernetes
///
/// Returns 200 if the server process is running and can handle requests.
/// This should NOT check the store - that's what readiness is for.
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe - verifies the store answers
///
/// # Response
/// - 200 OK if the store is reachable
/// - 503 Service Unavailable otherwise
async fn readiness_probe(State(state): State<HealthState>) -> impl IntoResponse {
    let started = Instant::now();
    let result = state.store.ping().await;
    let response_time_ms = started.elapsed().as_millis() as u64;

    let (status_code, response) = match result {
        Ok(()) => (
            StatusCode::OK,
            ReadinessResponse {
                status: ServiceStatus::Healthy,
                store: state.store.backend_name(),
                response_time_ms,
                error: None,
            },
        ),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ReadinessResponse {
                    status: ServiceStatus::Unhealthy,
                    store: state.store.backend_name(),
                    response_time_ms,
                    error: Some(err.to_string()),
                },
            )
        }
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health() {
        let response = simple_health().await;
        assert_eq!(response, "OK");
    }

    #[tokio::test]
    async fn test_liveness_probe() {
        let response = liveness_probe().await;
        let json = response.into_response();
        assert_eq!(json.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_on_memory_store() {
        let state = HealthState::new(Store::memory());
        let response = readiness_probe(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
