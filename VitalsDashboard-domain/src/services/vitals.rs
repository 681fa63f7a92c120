use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use vitals_dashboard_data::repository::{ClientError, PatientRepositoryTrait, SharedPatientRepository};

use crate::entities::conversions::{self, ConversionError};
use crate::entities::patient::{AssessedVitalRecord, Patient, PatientOverview};
use crate::entities::timeseries::TimeSeries;
use crate::entities::vitals::{Metric, VitalRecord};
use crate::services::normalizer::{normalize_vitals, NormalizationError, RawVitalsInput};
use crate::services::thresholds::evaluate_thresholds;
use crate::services::timeseries::align_vitals;

/// Vitals service errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VitalsServiceError {
    /// Submission failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A required selection or input was missing
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Patient or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No response from the backend
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a failure
    #[error("Backend error: {0}")]
    BackendError(String),

    /// The backend answered with data the domain cannot represent
    #[error("Invalid backend data: {0}")]
    InvalidData(String),
}

impl From<NormalizationError> for VitalsServiceError {
    fn from(err: NormalizationError) -> Self {
        match err {
            NormalizationError::MissingPatient => VitalsServiceError::PreconditionFailed(err.to_string()),
            NormalizationError::Validation(msg) => VitalsServiceError::ValidationError(msg),
        }
    }
}

impl From<ConversionError> for VitalsServiceError {
    fn from(err: ConversionError) -> Self {
        VitalsServiceError::InvalidData(err.to_string())
    }
}

/// Where chart data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartSource {
    /// The backend's pre-aligned graph payload, falling back to raw vitals when it is not offered
    #[default]
    GraphData,
    /// Raw vitals aligned client-side
    Vitals,
}

/// Trait for vitals service operations
#[async_trait]
pub trait VitalsServiceTrait: Send + Sync {
    /// List every registered patient
    async fn list_patients(&self) -> Result<Vec<Patient>, VitalsServiceError>;

    /// Get one patient with the most recent vitals assessed
    async fn get_patient(&self, patient_id: &str) -> Result<PatientOverview, VitalsServiceError>;

    /// Normalize a form submission and append it to the patient's vitals
    async fn record_vitals(
        &self,
        patient_id: &str,
        input: RawVitalsInput,
    ) -> Result<VitalRecord, VitalsServiceError>;

    /// Stored vitals for the trailing `days` days, each with its verdict, in the order received
    async fn vitals_with_status(
        &self,
        patient_id: &str,
        days: u32,
    ) -> Result<Vec<AssessedVitalRecord>, VitalsServiceError>;

    /// Chart data from the backend's pre-aligned payload
    async fn chart_from_graph_data(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
    ) -> Result<TimeSeries, VitalsServiceError>;

    /// Chart data aligned from raw vitals
    async fn chart_from_vitals(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
    ) -> Result<TimeSeries, VitalsServiceError>;

    /// Chart data from the requested source
    async fn chart(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
        source: ChartSource,
    ) -> Result<TimeSeries, VitalsServiceError>;
}

/// Vitals service for domain logic
pub struct VitalsService<R: PatientRepositoryTrait + ?Sized> {
    repository: Arc<R>,
}

impl<R: PatientRepositoryTrait + ?Sized> VitalsService<R> {
    /// Create a new vitals service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: ClientError) -> VitalsServiceError {
        match err {
            ClientError::NotFound(msg) => VitalsServiceError::NotFound(msg),
            ClientError::Unreachable(msg) => VitalsServiceError::Unreachable(msg),
            ClientError::Service { message, .. } => VitalsServiceError::BackendError(message),
            ClientError::Decode(msg) => VitalsServiceError::InvalidData(msg),
            _ => VitalsServiceError::BackendError(err.to_string()),
        }
    }

    async fn domain_vitals(&self, patient_id: &str, days: u32) -> Result<Vec<VitalRecord>, VitalsServiceError> {
        let rows = self
            .repository
            .get_vitals(patient_id, days)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        rows.into_iter()
            .map(|row| conversions::convert_to_domain_vital_record(row, patient_id))
            .collect::<Result<Vec<_>, _>>()
            .map_err(VitalsServiceError::from)
    }
}

fn assess(records: Vec<VitalRecord>) -> Vec<AssessedVitalRecord> {
    records
        .into_iter()
        .map(|record| {
            let verdict = evaluate_thresholds(&record);
            AssessedVitalRecord { record, verdict }
        })
        .collect()
}

fn require_patient(patient_id: &str) -> Result<(), VitalsServiceError> {
    if patient_id.trim().is_empty() {
        return Err(VitalsServiceError::PreconditionFailed(
            "A patient must be selected".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<R: PatientRepositoryTrait + ?Sized> VitalsServiceTrait for VitalsService<R> {
    #[instrument(skip(self))]
    async fn list_patients(&self) -> Result<Vec<Patient>, VitalsServiceError> {
        let patients = self
            .repository
            .list_patients()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(patients.into_iter().map(conversions::convert_to_domain_patient).collect())
    }

    #[instrument(skip(self))]
    async fn get_patient(&self, patient_id: &str) -> Result<PatientOverview, VitalsServiceError> {
        require_patient(patient_id)?;
        let mut data_patient = self
            .repository
            .get_patient(patient_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let recent = data_patient
            .recent_vitals
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|row| conversions::convert_to_domain_vital_record(row, patient_id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PatientOverview {
            patient: conversions::convert_to_domain_patient(data_patient),
            recent_vitals: assess(recent),
        })
    }

    #[instrument(skip(self, input))]
    async fn record_vitals(
        &self,
        patient_id: &str,
        input: RawVitalsInput,
    ) -> Result<VitalRecord, VitalsServiceError> {
        let record = normalize_vitals(patient_id, &input)?;
        let submission = conversions::convert_to_data_vitals_submission(&record);

        self.repository
            .add_vitals(&record.patient_id, submission)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Recorded vitals for {} on {}", record.patient_id, record.date);
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn vitals_with_status(
        &self,
        patient_id: &str,
        days: u32,
    ) -> Result<Vec<AssessedVitalRecord>, VitalsServiceError> {
        require_patient(patient_id)?;
        let assessed = assess(self.domain_vitals(patient_id, days).await?);

        let critical = assessed.iter().filter(|a| a.verdict.is_critical()).count();
        if critical > 0 {
            warn!("{} of {} vitals rows for {} are critical", critical, assessed.len(), patient_id);
        }
        Ok(assessed)
    }

    #[instrument(skip(self))]
    async fn chart_from_graph_data(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
    ) -> Result<TimeSeries, VitalsServiceError> {
        require_patient(patient_id)?;
        let graph = self
            .repository
            .get_graph_data(patient_id, days)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_time_series(graph, metrics)?)
    }

    #[instrument(skip(self))]
    async fn chart_from_vitals(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
    ) -> Result<TimeSeries, VitalsServiceError> {
        require_patient(patient_id)?;
        let records = self.domain_vitals(patient_id, days).await?;
        Ok(align_vitals(&records, metrics))
    }

    async fn chart(
        &self,
        patient_id: &str,
        days: u32,
        metrics: &[Metric],
        source: ChartSource,
    ) -> Result<TimeSeries, VitalsServiceError> {
        if source == ChartSource::Vitals {
            return self.chart_from_vitals(patient_id, days, metrics).await;
        }

        require_patient(patient_id)?;
        match self.repository.get_graph_data(patient_id, days).await {
            Ok(graph) => Ok(conversions::convert_to_domain_time_series(graph, metrics)?),
            Err(err) if err.is_unsupported() => {
                debug!("Graph data not offered ({}), aligning raw vitals", err);
                self.chart_from_vitals(patient_id, days, metrics).await
            }
            Err(err) => Err(self.map_repo_error(err)),
        }
    }
}

/// Create the vitals service over the configured repository
pub fn create_default_vitals_service(repository: SharedPatientRepository) -> Arc<dyn VitalsServiceTrait> {
    Arc::new(VitalsService::new(repository))
}
