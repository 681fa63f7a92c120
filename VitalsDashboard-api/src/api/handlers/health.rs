use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use vitals_dashboard_data::config::DataSource;
use vitals_dashboard_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthComponent as DomainHealthComponent, HealthService,
    HealthServiceTrait, SharedConnectivityMonitor, SystemStatus,
};

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Backend reachability as seen by the connectivity monitor
    pub backend: ComponentHealthStatus,
    /// Which data source is in use
    pub data_source: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health service handle shared through a request extension
pub type SharedHealthService = Arc<dyn HealthServiceTrait + Send + Sync>;

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

// Initialize the server start time
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = SERVER_START_TIME.set(start_time);
    });
}

/// Health check endpoint to verify the API and its backend
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<SharedHealthService>,
) -> Result<impl IntoResponse, axum::response::Response> {
    debug!("Health check requested");

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let component_statuses = ComponentStatus {
        backend: map_component(system_health.components.get("backend")),
        data_source: map_component(system_health.components.get("data_source")),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: component_statuses,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    match overall_status {
        "ok" => Ok((StatusCode::OK, Json(response))),
        "degraded" => Ok((StatusCode::SERVICE_UNAVAILABLE, Json(response))),
        _ => Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(response))),
    }
}

fn map_component(component: Option<&DomainHealthComponent>) -> ComponentHealthStatus {
    match component {
        Some(component) => ComponentHealthStatus {
            status: map_component_status(&component.status),
            message: component.details.clone(),
        },
        None => ComponentHealthStatus {
            status: "ok".to_string(),
            message: None,
        },
    }
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

/// Factory function to create a health service backed by the connectivity monitor
pub fn create_health_service(monitor: SharedConnectivityMonitor, source: DataSource) -> SharedHealthService {
    Arc::new(HealthService::new(monitor, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use vitals_dashboard_domain::testing::MockHealthService;

    async fn status_for(service: MockHealthService) -> StatusCode {
        initialize_server_start_time();
        let health_service: SharedHealthService = Arc::new(service);

        let response = health_check(Extension(health_service)).await.unwrap();
        response.into_response().status()
    }

    #[tokio::test]
    async fn test_health_check_response() {
        assert_eq!(status_for(MockHealthService::new()).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check_degraded_while_checking() {
        let service = MockHealthService::new()
            .with_checking_backend()
            .with_system_status(SystemStatus::Degraded);
        assert_eq!(status_for(service).await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_check_error_when_backend_unreachable() {
        let service = MockHealthService::new()
            .with_unreachable_backend()
            .with_system_status(SystemStatus::Unhealthy);
        assert_eq!(status_for(service).await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
