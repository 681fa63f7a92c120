// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use vitals_dashboard_data::repository::mock::MockPatientRepository;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};

/// Mock implementation of the HealthServiceTrait for testing
pub struct MockHealthService {
    /// Backend component status
    backend_status: ComponentStatus,
    /// System status
    system_status: SystemStatus,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            backend_status: ComponentStatus::Healthy,
            system_status: SystemStatus::Healthy,
        }
    }

    /// Configure the mock with a backend whose first probe is still outstanding
    pub fn with_checking_backend(mut self) -> Self {
        self.backend_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with an unreachable backend
    pub fn with_unreachable_backend(mut self) -> Self {
        self.backend_status = ComponentStatus::Unhealthy;
        self
    }

    /// Set the overall system status
    pub fn with_system_status(mut self, status: SystemStatus) -> Self {
        self.system_status = status;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "backend".to_string(),
            HealthComponent {
                status: self.backend_status.clone(),
                details: match self.backend_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Connection check in progress".to_string()),
                    ComponentStatus::Unhealthy => Some("Cannot connect to backend".to_string()),
                },
            },
        );

        components.insert(
            "data_source".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some("Demonstration dataset".to_string()),
            },
        );

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }
}
