use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};

use crate::api::state::VitalsService;
use crate::entities::common::ErrorResponse;
use crate::entities::patient::{convert_to_public_detail, convert_to_public_patient, Patient, PatientDetail};

/// List every registered patient
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Registered patients", body = [Patient]),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn list_patients(State(service): State<VitalsService>) -> Result<impl IntoResponse, Response> {
    match service.list_patients().await {
        Ok(patients) => {
            info!("Listed {} patients", patients.len());
            let patients: Vec<Patient> = patients.into_iter().map(convert_to_public_patient).collect();
            Ok((StatusCode::OK, Json(patients)))
        }
        Err(e) => {
            warn!("Failed to list patients: {}", e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}

/// Get one patient with the most recent vitals assessed
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Patient found", body = PatientDetail),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient(
    State(service): State<VitalsService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    match service.get_patient(&id).await {
        Ok(overview) => Ok((StatusCode::OK, Json(convert_to_public_detail(overview)))),
        Err(e) => {
            warn!("Failed to fetch patient {}: {}", id, e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}
