//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` answers as long as the process runs; `/health/ready` also
//! requires a non-empty campus graph.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` or `"not_ready: <reason>"`.
    pub status: String,

    pub service: String,

    pub version: String,

    /// RFC 3339 time the probe was answered.
    pub checked_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_loaded: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections_loaded: Option<usize>,
}

impl HealthStatus {
    fn base(status: String, service: &str, version: &str) -> Self {
        Self {
            status,
            service: service.to_string(),
            version: version.to_string(),
            checked_at: chrono::Utc::now().to_rfc3339(),
            locations_loaded: None,
            connections_loaded: None,
        }
    }

    pub fn alive(service: &str, version: &str) -> Self {
        Self::base("ok".to_string(), service, version)
    }

    /// Ready status with the size of the loaded campus.
    pub fn ready(service: &str, version: &str, locations: usize, connections: usize) -> Self {
        Self {
            locations_loaded: Some(locations),
            connections_loaded: Some(connections),
            ..Self::base("ok".to_string(), service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self::base(format!("not_ready: {}", reason), service, version)
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"campusnav-service-shared","version":"0.1.0","checked_at":"..."}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler; 503 while the campus graph is empty.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let navigator = state.navigator();
    let graph = navigator.graph();

    if graph.is_empty() {
        let status = HealthStatus::not_ready(service, version, "no locations loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, graph.len(), graph.edge_count());
    (StatusCode::OK, Json(status)).into_response()
}
