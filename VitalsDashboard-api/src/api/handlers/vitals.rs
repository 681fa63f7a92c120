use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};

use vitals_dashboard_data::config::DEFAULT_VITALS_DAYS;
use vitals_dashboard_domain::entities::AssessedVitalRecord;
use vitals_dashboard_domain::services::evaluate_thresholds;

use crate::api::state::VitalsService;
use crate::entities::common::ErrorResponse;
use crate::entities::patient::{
    convert_to_public_row, convert_to_raw_input, RecordVitalsRequest, VitalRow, VitalsQueryParams,
};

/// Reject a zero-day window
pub(crate) fn resolve_days(days: Option<u32>, default: u32) -> Result<u32, Response> {
    match days {
        None => Ok(default),
        Some(0) => Err(ErrorResponse::validation_error("days: must be at least 1", None).into_response()),
        Some(days) => Ok(days),
    }
}

/// Stored vitals for a trailing window, each row with its status
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/vitals",
    params(
        ("id" = String, Path, description = "Patient ID"),
        VitalsQueryParams
    ),
    responses(
        (status = 200, description = "Vitals rows in the order received", body = [VitalRow]),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_vitals(
    State(service): State<VitalsService>,
    Path(id): Path<String>,
    Query(params): Query<VitalsQueryParams>,
) -> Result<impl IntoResponse, Response> {
    let days = resolve_days(params.days, DEFAULT_VITALS_DAYS)?;

    match service.vitals_with_status(&id, days).await {
        Ok(rows) => {
            let critical = rows.iter().filter(|r| r.verdict.is_critical()).count();
            info!("Fetched {} vitals rows for {} ({} critical)", rows.len(), id, critical);
            let rows: Vec<VitalRow> = rows.into_iter().map(convert_to_public_row).collect();
            Ok((StatusCode::OK, Json(rows)))
        }
        Err(e) => {
            warn!("Failed to fetch vitals for {}: {}", id, e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}

/// Validate a vitals form submission and append it to the patient's record
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/vitals",
    params(
        ("id" = String, Path, description = "Patient ID")
    ),
    request_body = RecordVitalsRequest,
    responses(
        (status = 201, description = "Vitals recorded", body = VitalRow),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service, request))]
pub async fn record_vitals(
    State(service): State<VitalsService>,
    Path(id): Path<String>,
    Json(request): Json<RecordVitalsRequest>,
) -> Result<impl IntoResponse, Response> {
    match service.record_vitals(&id, convert_to_raw_input(request)).await {
        Ok(record) => {
            info!("Vitals recorded for {} on {}", id, record.date);
            let verdict = evaluate_thresholds(&record);
            let row = convert_to_public_row(AssessedVitalRecord { record, verdict });
            Ok((StatusCode::CREATED, Json(row)))
        }
        Err(e) => {
            warn!("Failed to record vitals for {}: {}", id, e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}
