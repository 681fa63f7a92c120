use serde::{Deserialize, Serialize};

use super::verdict::ThresholdVerdict;
use super::vitals::VitalRecord;

/// Registered patient, as shown in listings and pickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub department: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub condition: Option<String>,
    pub admission_date: Option<String>,
    pub expected_discharge_date: Option<String>,
}

/// A stored vital record together with its threshold verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessedVitalRecord {
    pub record: VitalRecord,
    pub verdict: ThresholdVerdict,
}

/// A patient with the most recent vitals assessed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientOverview {
    pub patient: Patient,
    pub recent_vitals: Vec<AssessedVitalRecord>,
}
