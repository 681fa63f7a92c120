use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::errors::ClientError;
use super::patients::PatientRepositoryTrait;
use crate::models::{
    AnalysisResponse, CreatePatientRequest, GraphData, MedicalHistory, Patient, UpdatePatientRequest,
    VitalRecord, VitalsSubmission,
};

/// Number of vitals rows attached to a single-patient lookup
const RECENT_VITALS_DAYS: usize = 5;

/// In-memory repository serving the fixed demonstration dataset.
///
/// Never touches the network. Writes are kept in memory for the life of the process.
#[derive(Debug, Clone)]
pub struct DemoPatientRepository {
    patients: Arc<Mutex<Vec<Patient>>>,
    vitals: Arc<Mutex<Vec<VitalRecord>>>,
}

impl Default for DemoPatientRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoPatientRepository {
    /// Create a repository seeded with the demonstration patients
    pub fn new() -> Self {
        let patients = demo_patients();
        let vitals = patients
            .iter()
            .flat_map(|p| p.recent_vitals.clone().unwrap_or_default())
            .collect();
        let patients = patients
            .into_iter()
            .map(|mut p| {
                p.recent_vitals = None;
                p
            })
            .collect();

        Self {
            patients: Arc::new(Mutex::new(patients)),
            vitals: Arc::new(Mutex::new(vitals)),
        }
    }

    /// Rows for one patient, oldest first, limited to the newest `limit`
    fn vitals_for(&self, patient_id: &str, limit: usize) -> Result<Vec<VitalRecord>, ClientError> {
        let store = self.vitals.lock()?;
        let mut rows: Vec<VitalRecord> = store
            .iter()
            .filter(|row| row.patient_id.as_deref() == Some(patient_id))
            .cloned()
            .collect();
        // ISO dates sort lexicographically; stable sort keeps insertion order per date
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        let skip = rows.len().saturating_sub(limit);
        Ok(rows.into_iter().skip(skip).collect())
    }

    fn ensure_patient(&self, patient_id: &str) -> Result<(), ClientError> {
        let store = self.patients.lock()?;
        if store.iter().any(|p| p.patient_id == patient_id) {
            Ok(())
        } else {
            Err(ClientError::NotFound("Patient not found".to_string()))
        }
    }

    fn next_patient_id(patients: &[Patient]) -> String {
        let next = patients
            .iter()
            .filter_map(|p| {
                let digits: String = p
                    .patient_id
                    .chars()
                    .rev()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                digits.parse::<u32>().ok()
            })
            .max()
            .map_or(1, |n| n + 1);
        format!("PID-{:03}", next)
    }
}

#[async_trait]
impl PatientRepositoryTrait for DemoPatientRepository {
    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        debug!("Using demonstration data for patient list");
        let store = self.patients.lock()?;
        Ok(store.clone())
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Patient, ClientError> {
        let mut patient = {
            let store = self.patients.lock()?;
            store
                .iter()
                .find(|p| p.patient_id == patient_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound("Patient not found".to_string()))?
        };
        patient.medical_history = Some(MedicalHistory::default());
        patient.recent_vitals = Some(self.vitals_for(patient_id, RECENT_VITALS_DAYS)?);
        Ok(patient)
    }

    async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, ClientError> {
        let mut store = self.patients.lock()?;
        let patient_id = match request.patient_id.clone() {
            Some(id) if !id.trim().is_empty() => id,
            _ => Self::next_patient_id(&store),
        };
        let patient = Patient::from_request(patient_id, request);
        store.push(patient.clone());
        debug!("Created demonstration patient {}", patient.patient_id);
        Ok(patient)
    }

    async fn update_patient(
        &self,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, ClientError> {
        let mut store = self.patients.lock()?;
        let patient = store
            .iter_mut()
            .find(|p| p.patient_id == patient_id)
            .ok_or_else(|| ClientError::NotFound("Patient not found".to_string()))?;
        patient.apply_update(request);
        Ok(patient.clone())
    }

    async fn delete_patient(&self, patient_id: &str) -> Result<(), ClientError> {
        self.patients.lock()?.retain(|p| p.patient_id != patient_id);
        self.vitals
            .lock()?
            .retain(|row| row.patient_id.as_deref() != Some(patient_id));
        Ok(())
    }

    async fn get_vitals(&self, patient_id: &str, days: u32) -> Result<Vec<VitalRecord>, ClientError> {
        self.vitals_for(patient_id, days as usize)
    }

    async fn add_vitals(&self, patient_id: &str, submission: VitalsSubmission) -> Result<(), ClientError> {
        self.ensure_patient(patient_id)?;
        let record = submission.into_record(patient_id);
        debug!("Storing demonstration vitals for {} on {}", patient_id, record.date);
        self.vitals.lock()?.push(record);
        Ok(())
    }

    async fn get_graph_data(&self, _patient_id: &str, _days: u32) -> Result<GraphData, ClientError> {
        Err(ClientError::Unsupported(
            "graph data is not served in demonstration mode".to_string(),
        ))
    }

    async fn analyze(&self, _patient_id: &str, _question: Option<&str>) -> Result<AnalysisResponse, ClientError> {
        Err(ClientError::Unsupported(
            "the analysis service is not configured in demonstration mode".to_string(),
        ))
    }

    async fn ask(&self, _patient_id: &str, _question: &str) -> Result<AnalysisResponse, ClientError> {
        Err(ClientError::Unsupported(
            "the analysis service is not configured in demonstration mode".to_string(),
        ))
    }

    async fn probe(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

fn demo_vital(patient_id: &str, temperature: f64, heart_beat: i32, respiratory_rate: i32, bp: &str, glucose: i32) -> VitalRecord {
    VitalRecord {
        date: "2024-01-18".to_string(),
        heart_beat: Some(heart_beat),
        body_temperature: Some(temperature),
        respiratory_rate: Some(respiratory_rate),
        blood_pressure: Some(bp.to_string()),
        blood_glucose: Some(glucose),
        patient_id: Some(patient_id.to_string()),
    }
}

/// The fixed demonstration patients
pub fn demo_patients() -> Vec<Patient> {
    vec![
        Patient {
            patient_id: "P001".to_string(),
            name: "John Smith".to_string(),
            age: Some(45),
            sex: Some("Male".to_string()),
            phone: Some("+1-555-0123".to_string()),
            department: Some("Cardiology".to_string()),
            diagnosis: Some("Hypertension".to_string()),
            treatment: Some("ACE inhibitors, lifestyle changes".to_string()),
            admission_date: Some("2024-01-15".to_string()),
            expected_discharge_date: Some("2024-01-20".to_string()),
            height_cm: Some(175.0),
            weight_kg: Some(80.0),
            condition: Some("Stable".to_string()),
            medical_history: None,
            recent_vitals: Some(vec![demo_vital("P001", 37.0, 78, 16, "140/90", 110)]),
        },
        Patient {
            patient_id: "P002".to_string(),
            name: "Sarah Johnson".to_string(),
            age: Some(32),
            sex: Some("Female".to_string()),
            phone: Some("+1-555-0124".to_string()),
            department: Some("Emergency".to_string()),
            diagnosis: Some("Acute appendicitis".to_string()),
            treatment: Some("Emergency surgery scheduled".to_string()),
            admission_date: Some("2024-01-18".to_string()),
            expected_discharge_date: Some("2024-01-22".to_string()),
            height_cm: Some(165.0),
            weight_kg: Some(65.0),
            condition: Some("Stable".to_string()),
            medical_history: None,
            recent_vitals: Some(vec![demo_vital("P002", 39.1, 95, 22, "120/80", 95)]),
        },
        Patient {
            patient_id: "P003".to_string(),
            name: "Michael Davis".to_string(),
            age: Some(67),
            sex: Some("Male".to_string()),
            phone: Some("+1-555-0125".to_string()),
            department: Some("Orthopedics".to_string()),
            diagnosis: Some("Hip fracture".to_string()),
            treatment: Some("Hip replacement surgery".to_string()),
            admission_date: Some("2024-01-16".to_string()),
            expected_discharge_date: Some("2024-01-25".to_string()),
            height_cm: Some(180.0),
            weight_kg: Some(85.0),
            condition: Some("Stable".to_string()),
            medical_history: None,
            recent_vitals: Some(vec![demo_vital("P003", 36.9, 72, 18, "130/85", 105)]),
        },
    ]
}
