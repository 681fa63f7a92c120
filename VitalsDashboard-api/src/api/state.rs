use std::sync::Arc;

use axum::extract::FromRef;

use vitals_dashboard_data::config::{DashboardConfig, DataSource};
use vitals_dashboard_data::repository::SharedPatientRepository;
use vitals_dashboard_domain::health::{ConnectivityMonitor, SharedConnectivityMonitor};
use vitals_dashboard_domain::services::{
    create_default_vitals_service, AnalysisSession, SharedAnalysisSession, VitalsServiceTrait,
};

/// Service type for dependency injection
pub type VitalsService = Arc<dyn VitalsServiceTrait>;

/// Everything the handlers share. Each field can be extracted on its own with `State<_>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub vitals: VitalsService,
    pub session: SharedAnalysisSession,
    pub monitor: SharedConnectivityMonitor,
}

impl AppState {
    /// Wire every service to one repository
    pub fn new(repository: SharedPatientRepository, config: &DashboardConfig) -> Self {
        let target = match &config.source {
            DataSource::Remote(url) => url.clone(),
            DataSource::Demo => "demonstration dataset".to_string(),
        };

        Self {
            vitals: create_default_vitals_service(repository.clone()),
            session: Arc::new(AnalysisSession::new(repository.clone())),
            monitor: Arc::new(ConnectivityMonitor::new(repository, target, config.probe_interval)),
        }
    }
}
