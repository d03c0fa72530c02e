//! Prometheus metrics for the campus navigation services.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use campusnav_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Reads `METRICS_ENABLED` (anything but `false` enables) and
    /// `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH").unwrap_or_else(|_| "/metrics".to_string());
        Self { enabled, path }
    }
}

/// Install the global Prometheus recorder. Only the first call succeeds.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Axum handler rendering the Prometheus exposition text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Count a route returned by a single-route endpoint.
///
/// `algorithm` is the provenance label slug, e.g. `dijkstra` or `a-star`.
pub fn record_route_calculated(algorithm: &str, service: &str) {
    metrics::counter!(
        "campusnav_routes_calculated_total",
        "algorithm" => algorithm.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Count a failed route query.
///
/// `reason` is one of `validation_error`, `unknown_location`, `no_route`.
pub fn record_route_failed(reason: &str, service: &str) {
    metrics::counter!(
        "campusnav_routes_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

pub fn record_route_hops(hops: usize, algorithm: &str) {
    metrics::histogram!(
        "campusnav_route_hops",
        "algorithm" => algorithm.to_string()
    )
    .record(hops as f64);
}

/// Size of the result set of a multi-route query (landmark, top, category, search).
pub fn record_routes_returned(count: usize, query_type: &str) {
    metrics::histogram!(
        "campusnav_routes_returned",
        "query_type" => query_type.to_string()
    )
    .record(count as f64);
}

/// Count a listing request (locations, landmarks, categories).
pub fn record_locations_listed(listing: &str) {
    metrics::counter!(
        "campusnav_listings_total",
        "listing" => listing.to_string()
    )
    .increment(1);
}
