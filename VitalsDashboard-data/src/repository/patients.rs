use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::demo::DemoPatientRepository;
use super::errors::ClientError;
use super::http::HttpPatientRepository;
use crate::config::{DashboardConfig, DataSource};
use crate::models::{
    AnalysisResponse, CreatePatientRequest, GraphData, Patient, UpdatePatientRequest, VitalRecord,
    VitalsSubmission,
};

/// Access to patients, vitals and the analysis service.
///
/// Every call is a suspending operation; none of them block other work.
#[async_trait]
pub trait PatientRepositoryTrait: Send + Sync {
    /// List every registered patient
    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError>;

    /// Get one patient with medical history and recent vitals attached
    async fn get_patient(&self, patient_id: &str) -> Result<Patient, ClientError>;

    /// Register a new patient
    async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, ClientError>;

    /// Overwrite fields of an existing patient
    async fn update_patient(
        &self,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, ClientError>;

    /// Remove a patient
    async fn delete_patient(&self, patient_id: &str) -> Result<(), ClientError>;

    /// Vitals for the trailing `days` days, oldest first
    async fn get_vitals(&self, patient_id: &str, days: u32) -> Result<Vec<VitalRecord>, ClientError>;

    /// Append one vitals row
    async fn add_vitals(&self, patient_id: &str, submission: VitalsSubmission) -> Result<(), ClientError>;

    /// Pre-aligned chart arrays for the trailing `days` days
    async fn get_graph_data(&self, patient_id: &str, days: u32) -> Result<GraphData, ClientError>;

    /// Full analysis of a patient, optionally steered by a question
    async fn analyze(&self, patient_id: &str, question: Option<&str>) -> Result<AnalysisResponse, ClientError>;

    /// Ask a single question about a patient
    async fn ask(&self, patient_id: &str, question: &str) -> Result<AnalysisResponse, ClientError>;

    /// Health probe against the patient listing endpoint
    async fn probe(&self) -> Result<(), ClientError>;
}

/// Shared handle to whichever repository the configuration selects
pub type SharedPatientRepository = Arc<dyn PatientRepositoryTrait>;

/// Create the repository selected by the configuration.
///
/// The demonstration dataset is only used when no base URL is configured.
pub fn create_patient_repository(config: &DashboardConfig) -> Result<SharedPatientRepository, ClientError> {
    match &config.source {
        DataSource::Remote(base_url) => {
            info!("Creating HTTP patient repository for {}", base_url);
            let repository = HttpPatientRepository::new(base_url.clone(), config.timeout)?;
            Ok(Arc::new(repository))
        }
        DataSource::Demo => {
            info!("Creating demonstration patient repository");
            Ok(Arc::new(DemoPatientRepository::new()))
        }
    }
}
