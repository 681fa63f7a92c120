//! Domain layer health check functionality
//! This module provides backend connectivity monitoring and service health checks

pub mod connectivity;

use std::collections::HashMap;

use async_trait::async_trait;
use vitals_dashboard_data::config::DataSource;

pub use connectivity::{
    ConnectionState, ConnectionStatus, ConnectivityMonitor, MonitorHandle, SharedConnectivityMonitor,
};

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health service reporting the connectivity monitor's view of the backend
pub struct HealthService {
    monitor: SharedConnectivityMonitor,
    source: DataSource,
}

impl HealthService {
    pub fn new(monitor: SharedConnectivityMonitor, source: DataSource) -> Self {
        Self { monitor, source }
    }
}

/// Map a connection status to a health component
pub fn backend_component(status: &ConnectionStatus) -> HealthComponent {
    match status.state {
        ConnectionState::Connected => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        ConnectionState::Checking => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Connection check in progress".to_string()),
        },
        ConnectionState::Disconnected => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(match &status.last_error {
                Some(err) => format!("Cannot connect to backend at {}: {}", status.target, err),
                None => format!("Cannot connect to backend at {}", status.target),
            }),
        },
    }
}

/// Overall status is the worst component status
pub fn overall_status(components: &HashMap<String, HealthComponent>) -> SystemStatus {
    if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
        SystemStatus::Unhealthy
    } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let backend = backend_component(&self.monitor.status());
        let data_source = HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(match &self.source {
                DataSource::Remote(url) => format!("Remote backend at {}", url),
                DataSource::Demo => "Demonstration dataset".to_string(),
            }),
        };

        let components: HashMap<String, HealthComponent> = vec![
            ("backend".to_string(), backend),
            ("data_source".to_string(), data_source),
        ]
        .into_iter()
        .collect();

        SystemHealth {
            status: overall_status(&components),
            components,
        }
    }
}
