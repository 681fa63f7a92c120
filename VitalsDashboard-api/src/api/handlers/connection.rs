use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use vitals_dashboard_domain::health::SharedConnectivityMonitor;

use crate::entities::connection::{convert_to_public_connection, ConnectionStatus};

/// Current backend connection status
#[utoipa::path(
    get,
    path = "/api/v1/connection",
    responses(
        (status = 200, description = "Last observed connection status", body = ConnectionStatus),
    ),
    tag = "connection"
)]
#[instrument(skip(monitor))]
pub async fn get_connection_status(State(monitor): State<SharedConnectivityMonitor>) -> impl IntoResponse {
    Json(convert_to_public_connection(monitor.status()))
}

/// Probe the backend now instead of waiting for the next poll
#[utoipa::path(
    post,
    path = "/api/v1/connection/retry",
    responses(
        (status = 200, description = "Connection status after the probe", body = ConnectionStatus),
    ),
    tag = "connection"
)]
#[instrument(skip(monitor))]
pub async fn retry_connection(State(monitor): State<SharedConnectivityMonitor>) -> impl IntoResponse {
    info!("Manual connection retry requested");
    monitor.probe_once().await;
    (StatusCode::OK, Json(convert_to_public_connection(monitor.status())))
}
