use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vitals_dashboard_domain::services::{SessionError, VitalsServiceError};

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self::new("not_found", format!("The requested {} could not be found", resource))
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self::new("bad_request", message)
    }

    /// Create a conflict error response
    pub fn conflict(message: &str) -> Self {
        Self::new("conflict", message)
    }

    /// The backend could not be reached at all
    pub fn backend_unreachable(message: &str) -> Self {
        Self::new("backend_unreachable", message)
    }

    /// The backend answered, but with a failure
    pub fn backend_error(message: &str) -> Self {
        Self::new("backend_error", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    /// HTTP status matching the error code
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "backend_unreachable" | "backend_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<VitalsServiceError> for ErrorResponse {
    fn from(err: VitalsServiceError) -> Self {
        match err {
            VitalsServiceError::ValidationError(msg) => Self::validation_error(&msg, None),
            VitalsServiceError::PreconditionFailed(msg) => Self::bad_request(&msg),
            VitalsServiceError::NotFound(msg) => Self {
                details: Some(serde_json::Value::String(msg)),
                ..Self::not_found("patient")
            },
            VitalsServiceError::Unreachable(msg) => Self::backend_unreachable(&msg),
            VitalsServiceError::BackendError(msg) => Self::backend_error(&msg),
            VitalsServiceError::InvalidData(msg) => {
                Self::backend_error(&format!("Backend returned malformed data: {}", msg))
            }
        }
    }
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::NoPatientSelected => Self::bad_request(&message),
            SessionError::EmptyQuestion => Self::validation_error(&message, None),
            SessionError::Busy => Self::conflict(&message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = vec![
            (VitalsServiceError::ValidationError("heart_rate".into()), StatusCode::BAD_REQUEST),
            (VitalsServiceError::PreconditionFailed("patient".into()), StatusCode::BAD_REQUEST),
            (VitalsServiceError::NotFound("P999".into()), StatusCode::NOT_FOUND),
            (VitalsServiceError::Unreachable("refused".into()), StatusCode::BAD_GATEWAY),
            (VitalsServiceError::BackendError("HTTP 500".into()), StatusCode::BAD_GATEWAY),
            (VitalsServiceError::InvalidData("date".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_backend_message_is_kept() {
        let response = ErrorResponse::from(VitalsServiceError::BackendError(
            "Patient already exists".to_string(),
        ));
        assert_eq!(response.error, "backend_error");
        assert_eq!(response.message, "Patient already exists");
    }

    #[test]
    fn test_session_errors_map_to_statuses() {
        assert_eq!(ErrorResponse::from(SessionError::Busy).status(), StatusCode::CONFLICT);
        assert_eq!(ErrorResponse::from(SessionError::EmptyQuestion).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorResponse::from(SessionError::NoPatientSelected).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
