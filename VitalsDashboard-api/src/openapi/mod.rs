use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health and connectivity endpoints
        crate::api::handlers::health::health_check,
        crate::api::handlers::connection::get_connection_status,
        crate::api::handlers::connection::retry_connection,

        // Patient and vitals endpoints
        crate::api::handlers::patients::list_patients,
        crate::api::handlers::patients::get_patient,
        crate::api::handlers::vitals::get_vitals,
        crate::api::handlers::vitals::record_vitals,
        crate::api::handlers::chart::get_chart,

        // Analysis session endpoints
        crate::api::handlers::session::get_session,
        crate::api::handlers::session::select_patient,
        crate::api::handlers::session::ask_question,
        crate::api::handlers::session::analyze_patient,
        crate::api::handlers::session::clear_messages
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::patient::Patient,
            crate::entities::patient::PatientDetail,
            crate::entities::patient::VitalRecord,
            crate::entities::patient::VitalStatus,
            crate::entities::patient::VitalRow,
            crate::entities::patient::RecordVitalsRequest,
            crate::entities::chart::ChartResponse,
            crate::entities::chart::ChartSeries,
            crate::entities::connection::ConnectionStatus,
            crate::entities::session::ChatMessage,
            crate::entities::session::SelectedPatient,
            crate::entities::session::SessionState,
            crate::entities::session::SelectPatientRequest,
            crate::entities::session::AskQuestionRequest,
            crate::entities::session::ExchangeResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "connection", description = "Backend connectivity status"),
        (name = "patients", description = "Patient listing and lookup"),
        (name = "vitals", description = "Vitals entry, status table and charts"),
        (name = "session", description = "Analysis chat session")
    ),
    info(
        title = "Vitals Dashboard API",
        version = "0.1.0",
        description = "Patient vitals monitoring: threshold checks, chart series and analysis chat",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "Vitals Dashboard API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "session"));
        assert!(tags.iter().any(|tag| tag.name == "vitals"));

        let paths = &openapi.paths.paths;
        for path in [
            "/api/v1/health",
            "/api/v1/connection",
            "/api/v1/connection/retry",
            "/api/v1/patients",
            "/api/v1/patients/{id}",
            "/api/v1/patients/{id}/vitals",
            "/api/v1/patients/{id}/chart",
            "/api/v1/session",
            "/api/v1/session/patient",
            "/api/v1/session/ask",
            "/api/v1/session/analyze",
            "/api/v1/session/messages",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_schemas_are_registered() {
        let openapi = ApiDoc::openapi();
        let schemas = &openapi.components.as_ref().unwrap().schemas;

        assert!(schemas.contains_key("ErrorResponse"));
        assert!(schemas.contains_key("VitalRow"));
        assert!(schemas.contains_key("ChartResponse"));
    }
}
