use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use vitals_dashboard_domain::entities::{
    AssessedVitalRecord, Patient as DomainPatient, PatientOverview, ThresholdVerdict,
    VitalRecord as DomainVitalRecord,
};
use vitals_dashboard_domain::services::RawVitalsInput;

/// Public representation of a patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    /// Backend-assigned identifier
    #[schema(example = "P001")]
    pub patient_id: String,

    /// Full name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    /// Ward or department
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Admission date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,

    /// Expected discharge date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_discharge_date: Option<String>,
}

/// One day's vital signs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalRecord {
    /// Observation date (YYYY-MM-DD)
    #[schema(example = "2024-01-18")]
    pub date: String,

    /// Beats per minute
    pub heart_rate: Option<i32>,

    /// Degrees Celsius
    pub body_temperature: Option<f64>,

    /// Breaths per minute
    pub respiratory_rate: Option<i32>,

    /// Systolic/diastolic in mmHg
    #[schema(example = "120/80")]
    pub blood_pressure: Option<String>,

    /// mg/dL
    pub blood_glucose: Option<i32>,

    pub patient_id: String,
}

/// Normal/Critical classification of a vitals row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalStatus {
    /// True when at least one reason is present
    pub is_critical: bool,

    /// Why the row was flagged, in evaluation order
    pub reasons: Vec<String>,
}

/// A vitals row with its status, as shown in the status table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalRow {
    pub record: VitalRecord,
    pub status: VitalStatus,
}

/// A patient with the most recent vitals assessed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientDetail {
    pub patient: Patient,
    pub recent_vitals: Vec<VitalRow>,
}

/// Request payload for recording vitals, exactly as typed into the entry form.
///
/// Clinical fields are optional free text; blank means "not measured".
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecordVitalsRequest {
    /// Observation date (YYYY-MM-DD)
    #[schema(example = "2024-01-20")]
    pub date: String,

    #[serde(default)]
    #[schema(example = "72")]
    pub heart_rate: Option<String>,

    #[serde(default)]
    #[schema(example = "36.8")]
    pub body_temperature: Option<String>,

    #[serde(default)]
    pub respiratory_rate: Option<String>,

    #[serde(default)]
    #[schema(example = "120/80")]
    pub blood_pressure: Option<String>,

    #[serde(default)]
    pub blood_glucose: Option<String>,
}

/// Query parameters for retrieving vitals
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct VitalsQueryParams {
    /// Trailing window in days (default: 5)
    pub days: Option<u32>,
}

/// Convert domain patient to public patient
pub fn convert_to_public_patient(patient: DomainPatient) -> Patient {
    Patient {
        patient_id: patient.patient_id,
        name: patient.name,
        age: patient.age,
        sex: patient.sex,
        department: patient.department,
        diagnosis: patient.diagnosis,
        treatment: patient.treatment,
        condition: patient.condition,
        admission_date: patient.admission_date,
        expected_discharge_date: patient.expected_discharge_date,
    }
}

/// Convert domain vital record to public vital record
pub fn convert_to_public_vital_record(record: DomainVitalRecord) -> VitalRecord {
    VitalRecord {
        date: record.date.to_string(),
        heart_rate: record.heart_rate,
        body_temperature: record.body_temperature,
        respiratory_rate: record.respiratory_rate,
        blood_pressure: record.blood_pressure,
        blood_glucose: record.blood_glucose,
        patient_id: record.patient_id,
    }
}

pub fn convert_to_public_status(verdict: &ThresholdVerdict) -> VitalStatus {
    VitalStatus {
        is_critical: verdict.is_critical(),
        reasons: verdict.reasons().iter().map(|r| r.to_string()).collect(),
    }
}

pub fn convert_to_public_row(row: AssessedVitalRecord) -> VitalRow {
    VitalRow {
        status: convert_to_public_status(&row.verdict),
        record: convert_to_public_vital_record(row.record),
    }
}

pub fn convert_to_public_detail(overview: PatientOverview) -> PatientDetail {
    PatientDetail {
        patient: convert_to_public_patient(overview.patient),
        recent_vitals: overview.recent_vitals.into_iter().map(convert_to_public_row).collect(),
    }
}

/// Convert public request to the normalizer's raw input
pub fn convert_to_raw_input(request: RecordVitalsRequest) -> RawVitalsInput {
    RawVitalsInput {
        date: request.date,
        heart_rate: request.heart_rate,
        body_temperature: request.body_temperature,
        respiratory_rate: request.respiratory_rate,
        blood_pressure: request.blood_pressure,
        blood_glucose: request.blood_glucose,
    }
}
