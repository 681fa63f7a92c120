use serde::{Deserialize, Serialize};

use super::vitals::VitalRecord;

/// Patient record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Backend-assigned identifier (e.g. `PID-001`)
    #[serde(rename = "PatientID")]
    pub patient_id: String,

    /// Full name
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(rename = "Sex", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Ward or department the patient is admitted to
    #[serde(rename = "Department", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(rename = "Diagnosis", default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    #[serde(rename = "Treatment", default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    /// Admission date, `YYYY-MM-DD`
    #[serde(rename = "AdmissionDate", default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,

    /// Expected discharge date, `YYYY-MM-DD`
    #[serde(rename = "ExpectedDischargeDate", default, skip_serializing_if = "Option::is_none")]
    pub expected_discharge_date: Option<String>,

    #[serde(rename = "Height_cm", default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    #[serde(rename = "Weight_kg", default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    /// Free-text condition label (e.g. "Stable")
    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Only present on single-patient lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,

    /// Only present on single-patient lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_vitals: Option<Vec<VitalRecord>>,
}

/// Medical history attached to a patient. The backend answers `{}` when none exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    #[serde(rename = "PatientID", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    #[serde(rename = "ChronicConditions", default, skip_serializing_if = "Option::is_none")]
    pub chronic_conditions: Option<String>,

    #[serde(rename = "PastSurgeries", default, skip_serializing_if = "Option::is_none")]
    pub past_surgeries: Option<String>,

    #[serde(rename = "KnownAllergies", default, skip_serializing_if = "Option::is_none")]
    pub known_allergies: Option<String>,

    #[serde(rename = "FamilyHistory", default, skip_serializing_if = "Option::is_none")]
    pub family_history: Option<String>,
}

/// Payload for `POST /patients/`. The backend generates an ID when none is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    #[serde(rename = "PatientID", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(rename = "Sex", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "Department", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(rename = "Diagnosis", default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    #[serde(rename = "Treatment", default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    #[serde(rename = "AdmissionDate", default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,

    #[serde(rename = "ExpectedDischargeDate", default, skip_serializing_if = "Option::is_none")]
    pub expected_discharge_date: Option<String>,

    #[serde(rename = "Height_cm", default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    #[serde(rename = "Weight_kg", default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Payload for `PUT /patients/{id}`. Absent fields are left untouched (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(rename = "Sex", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "Department", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(rename = "Diagnosis", default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    #[serde(rename = "Treatment", default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    #[serde(rename = "AdmissionDate", default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,

    #[serde(rename = "ExpectedDischargeDate", default, skip_serializing_if = "Option::is_none")]
    pub expected_discharge_date: Option<String>,

    #[serde(rename = "Height_cm", default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    #[serde(rename = "Weight_kg", default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Patient {
    /// Build a stored patient from a create request and an assigned ID
    pub fn from_request(patient_id: String, request: CreatePatientRequest) -> Self {
        Self {
            patient_id,
            name: request.name,
            age: request.age,
            sex: request.sex,
            phone: request.phone,
            department: request.department,
            diagnosis: request.diagnosis,
            treatment: request.treatment,
            admission_date: request.admission_date,
            expected_discharge_date: request.expected_discharge_date,
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            condition: request.condition,
            medical_history: None,
            recent_vitals: None,
        }
    }

    /// Overwrite every field the update carries
    pub fn apply_update(&mut self, update: UpdatePatientRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if update.age.is_some() {
            self.age = update.age;
        }
        if update.sex.is_some() {
            self.sex = update.sex;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.department.is_some() {
            self.department = update.department;
        }
        if update.diagnosis.is_some() {
            self.diagnosis = update.diagnosis;
        }
        if update.treatment.is_some() {
            self.treatment = update.treatment;
        }
        if update.admission_date.is_some() {
            self.admission_date = update.admission_date;
        }
        if update.expected_discharge_date.is_some() {
            self.expected_discharge_date = update.expected_discharge_date;
        }
        if update.height_cm.is_some() {
            self.height_cm = update.height_cm;
        }
        if update.weight_kg.is_some() {
            self.weight_kg = update.weight_kg;
        }
        if update.condition.is_some() {
            self.condition = update.condition;
        }
    }
}
