//! Campus walking-route HTTP microservice.
//!
//! # Configuration
//!
//! - `CAMPUSNAV_TOPOLOGY_PATH` - Campus topology JSON (bundled campus when unset)
//! - `CAMPUSNAV_WALKING_SPEED_KMH` - Walking speed for time estimates (default: 5)
//! - `CAMPUSNAV_TRAFFIC_DEFAULT` - Default traffic condition: light, moderate or heavy
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint (default: enabled at `/metrics`)
//!
//! On Unix, `SIGHUP` reloads the topology; a failed reload keeps the current campus.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info};

use campusnav_lib::topology::TOPOLOGY_PATH_ENV;
use campusnav_service_route::app_with_metrics_path;
use campusnav_service_shared::{
    AppState, LoggingConfig, MetricsConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let topology_path = env::var(TOPOLOGY_PATH_ENV).ok().map(PathBuf::from);
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let state = AppState::load(topology_path.as_deref()).map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;

    #[cfg(unix)]
    spawn_reload_on_hangup(state.clone())?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app_with_metrics_path(state, &metrics_config.path)).await?;

    Ok(())
}

#[cfg(unix)]
fn spawn_reload_on_hangup(state: AppState) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!(topology = ?state.topology_path(), "received SIGHUP, reloading topology");
            if let Err(e) = state.reload() {
                error!(error = %e, "topology reload failed, keeping current campus");
            }
        }
    });
    Ok(())
}
