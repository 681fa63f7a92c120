pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;

use vitals_dashboard_data::config::DashboardConfig;
use vitals_dashboard_data::repository::SharedPatientRepository;

pub use state::AppState;

/// Create the application router and the state it shares with the caller
pub fn create_application(repository: SharedPatientRepository, config: &DashboardConfig) -> (Router, AppState) {
    let state = AppState::new(repository, config);
    let health_service = handlers::health::create_health_service(state.monitor.clone(), config.source.clone());

    handlers::health::initialize_server_start_time();

    (routes::create_app(state.clone(), health_service), state)
}
