use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use vitals_dashboard_domain::entities::{AnalysisExchange, PatientSelection};
use vitals_dashboard_domain::services::{SessionError, SharedAnalysisSession};

use crate::api::state::VitalsService;
use crate::entities::common::ErrorResponse;
use crate::entities::session::{
    convert_to_public_exchange, convert_to_public_session, AskQuestionRequest, ExchangeResponse,
    SelectPatientRequest, SessionState,
};

/// Run an exchange on its own task so a disconnecting client cannot cut it short
async fn run_detached<F>(exchange: F) -> Result<impl IntoResponse, Response>
where
    F: std::future::Future<Output = Result<AnalysisExchange, SessionError>> + Send + 'static,
{
    match tokio::spawn(exchange).await {
        Ok(Ok(exchange)) => {
            if !exchange.succeeded {
                warn!("Analysis request for {} failed; apology recorded", exchange.patient_id);
            }
            Ok((StatusCode::OK, Json(convert_to_public_exchange(exchange))))
        }
        Ok(Err(e)) => {
            info!("Analysis request rejected: {}", e);
            Err(ErrorResponse::from(e).into_response())
        }
        Err(e) => {
            error!("Analysis task failed: {}", e);
            Err(ErrorResponse::internal_error().into_response())
        }
    }
}

/// Current session state: message log, selected patient and pending flag
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session state", body = SessionState),
    ),
    tag = "session"
)]
#[instrument(skip(session))]
pub async fn get_session(State(session): State<SharedAnalysisSession>) -> impl IntoResponse {
    Json(convert_to_public_session(session.snapshot()))
}

/// Select the patient subsequent questions are about, or clear the selection
#[utoipa::path(
    put,
    path = "/api/v1/session/patient",
    request_body = SelectPatientRequest,
    responses(
        (status = 200, description = "Selection updated", body = SessionState),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(session, vitals))]
pub async fn select_patient(
    State(session): State<SharedAnalysisSession>,
    State(vitals): State<VitalsService>,
    Json(request): Json<SelectPatientRequest>,
) -> Result<impl IntoResponse, Response> {
    let patient_id = request
        .patient_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let selection = match patient_id {
        Some(id) => {
            let overview = vitals.get_patient(&id).await.map_err(|e| {
                warn!("Cannot select patient {}: {}", id, e);
                ErrorResponse::from(e).into_response()
            })?;
            info!("Session patient set to {}", id);
            Some(PatientSelection::new(id, Some(overview.patient.name)))
        }
        None => {
            info!("Session patient cleared");
            None
        }
    };

    session.select_patient(selection);
    Ok((StatusCode::OK, Json(convert_to_public_session(session.snapshot()))))
}

/// Ask a question about the selected patient
#[utoipa::path(
    post,
    path = "/api/v1/session/ask",
    request_body = AskQuestionRequest,
    responses(
        (status = 200, description = "Answer appended to the log (an apology when the request failed)", body = ExchangeResponse),
        (status = 400, description = "No patient selected or empty question", body = ErrorResponse),
        (status = 409, description = "Another request is awaiting a response", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(session, request))]
pub async fn ask_question(
    State(session): State<SharedAnalysisSession>,
    Json(request): Json<AskQuestionRequest>,
) -> Result<impl IntoResponse, Response> {
    run_detached(async move { session.ask(&request.question).await }).await
}

/// Request a full analysis of the selected patient
#[utoipa::path(
    post,
    path = "/api/v1/session/analyze",
    responses(
        (status = 200, description = "Analysis appended to the log (an apology when the request failed)", body = ExchangeResponse),
        (status = 400, description = "No patient selected", body = ErrorResponse),
        (status = 409, description = "Another request is awaiting a response", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip(session))]
pub async fn analyze_patient(State(session): State<SharedAnalysisSession>) -> Result<impl IntoResponse, Response> {
    run_detached(async move { session.analyze().await }).await
}

/// Clear the message log. An outstanding request still appends its reply.
#[utoipa::path(
    delete,
    path = "/api/v1/session/messages",
    responses(
        (status = 204, description = "Message log cleared"),
    ),
    tag = "session"
)]
#[instrument(skip(session))]
pub async fn clear_messages(State(session): State<SharedAnalysisSession>) -> impl IntoResponse {
    session.clear();
    info!("Session messages cleared");
    StatusCode::NO_CONTENT
}
