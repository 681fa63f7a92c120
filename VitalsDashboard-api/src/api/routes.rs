use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{chart, connection, health, patients, session, vitals};
use crate::api::handlers::health::SharedHealthService;
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(state: AppState, health_service: SharedHealthService) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/connection", get(connection::get_connection_status))
        .route("/connection/retry", post(connection::retry_connection))
        .route("/patients", get(patients::list_patients))
        .route("/patients/:id", get(patients::get_patient))
        .route("/patients/:id/vitals", get(vitals::get_vitals).post(vitals::record_vitals))
        .route("/patients/:id/chart", get(chart::get_chart))
        .route("/session", get(session::get_session))
        .route("/session/patient", put(session::select_patient))
        .route("/session/ask", post(session::ask_question))
        .route("/session/analyze", post(session::analyze_patient))
        .route("/session/messages", delete(session::clear_messages))
        .layer(Extension(health_service))
        .with_state(state);

    debug!("API routes configured");

    let app = Router::new().nest("/api/v1", api_routes);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    configure_http_layers(app)
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// CORS for browser dashboards, basic response hardening and request tracing
pub fn configure_http_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    app.layer(cors)
        .layer(security_headers)
        .layer(TraceLayer::new_for_http())
}
