use serde::{Deserialize, Serialize};

/// One stored vitals row, keyed the way the backend tables name their columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRecord {
    /// Observation date, `YYYY-MM-DD`
    #[serde(rename = "Date")]
    pub date: String,

    /// Heart rate in beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_beat: Option<i32>,

    /// Body temperature in degrees Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_temperature: Option<f64>,

    /// Breaths per minute (the backend column keeps its historical spelling)
    #[serde(rename = "Respitory_rate", default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<i32>,

    /// `<systolic>/<diastolic>` in mmHg, stored verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,

    /// Blood glucose in mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<i32>,

    #[serde(rename = "patient_id", alias = "patient id", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

/// Body of `POST /patients/{id}/vitals/shift`. The backend fills in the patient ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSubmission {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_beat: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_temperature: Option<f64>,

    #[serde(rename = "Respitory_rate", default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<i32>,
}

impl VitalsSubmission {
    /// Attach the owning patient to turn a submission into a stored row
    pub fn into_record(self, patient_id: &str) -> VitalRecord {
        VitalRecord {
            date: self.date,
            heart_beat: self.heart_beat,
            body_temperature: self.body_temperature,
            respiratory_rate: self.respiratory_rate,
            blood_pressure: self.blood_pressure,
            blood_glucose: self.blood_glucose,
            patient_id: Some(patient_id.to_string()),
        }
    }
}

/// Pre-aligned chart payload from `GET /patients/{id}/graph-data`.
///
/// Every array is meant to line up with `dates`; missing arrays decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub dates: Vec<String>,

    #[serde(default)]
    pub heart_rate: Vec<Option<f64>>,

    #[serde(default)]
    pub temperature: Vec<Option<f64>>,

    #[serde(default)]
    pub systolic: Vec<Option<f64>>,

    #[serde(default)]
    pub diastolic: Vec<Option<f64>>,

    #[serde(default)]
    pub glucose: Vec<Option<f64>>,
}
