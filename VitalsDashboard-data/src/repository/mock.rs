// Scriptable repository for tests in this crate and its dependents
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::errors::ClientError;
use super::patients::PatientRepositoryTrait;
use crate::models::{
    AnalysisResponse, CreatePatientRequest, GraphData, Patient, UpdatePatientRequest, VitalRecord,
    VitalsSubmission,
};

/// Mock implementation of PatientRepositoryTrait for testing
pub struct MockPatientRepository {
    patients: Mutex<Vec<Patient>>,
    vitals: Mutex<Vec<VitalRecord>>,
    graph_data: Mutex<Result<GraphData, ClientError>>,
    analysis: Mutex<Result<AnalysisResponse, ClientError>>,
    probe_script: Mutex<VecDeque<Result<(), ClientError>>>,
    probe_fallback: Mutex<Result<(), ClientError>>,
    vitals_failure: Mutex<Option<ClientError>>,
    gate: Option<Arc<Notify>>,
    analysis_calls: AtomicUsize,
    probe_calls: AtomicUsize,
    last_question: Mutex<Option<String>>,
}

impl Default for MockPatientRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPatientRepository {
    /// Create an empty mock repository.
    ///
    /// Graph data is unsupported, analyses return an empty response and probes succeed.
    pub fn new() -> Self {
        Self {
            patients: Mutex::new(Vec::new()),
            vitals: Mutex::new(Vec::new()),
            graph_data: Mutex::new(Err(ClientError::Unsupported("no graph data".to_string()))),
            analysis: Mutex::new(Ok(AnalysisResponse::default())),
            probe_script: Mutex::new(VecDeque::new()),
            probe_fallback: Mutex::new(Ok(())),
            vitals_failure: Mutex::new(None),
            gate: None,
            analysis_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            last_question: Mutex::new(None),
        }
    }

    /// Add predefined patients
    pub fn with_patients(self, patients: Vec<Patient>) -> Self {
        *self.patients.lock().unwrap() = patients;
        self
    }

    /// Add predefined vitals rows
    pub fn with_vitals(self, vitals: Vec<VitalRecord>) -> Self {
        *self.vitals.lock().unwrap() = vitals;
        self
    }

    /// Serve this payload from the graph-data endpoint
    pub fn with_graph_data(self, data: GraphData) -> Self {
        *self.graph_data.lock().unwrap() = Ok(data);
        self
    }

    /// Fail the graph-data endpoint
    pub fn with_graph_error(self, error: ClientError) -> Self {
        *self.graph_data.lock().unwrap() = Err(error);
        self
    }

    /// Answer every analysis request with this response
    pub fn with_analysis(self, response: AnalysisResponse) -> Self {
        *self.analysis.lock().unwrap() = Ok(response);
        self
    }

    /// Fail every analysis request
    pub fn with_analysis_failure(self, error: ClientError) -> Self {
        *self.analysis.lock().unwrap() = Err(error);
        self
    }

    /// Fail every vitals read and write
    pub fn with_vitals_failure(self, error: ClientError) -> Self {
        *self.vitals_failure.lock().unwrap() = Some(error);
        self
    }

    /// Queue probe outcomes; once drained, probes repeat the last queued outcome
    pub fn with_probe_results(self, results: Vec<Result<(), ClientError>>) -> Self {
        if let Some(last) = results.last() {
            *self.probe_fallback.lock().unwrap() = last.clone();
        }
        *self.probe_script.lock().unwrap() = results.into();
        self
    }

    /// Hold analysis requests until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of analyze and ask calls received
    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    /// Number of probes received
    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Question carried by the most recent analysis call
    pub fn last_question(&self) -> Option<String> {
        self.last_question.lock().unwrap().clone()
    }

    /// Every stored vitals row, including submitted ones
    pub fn stored_vitals(&self) -> Vec<VitalRecord> {
        self.vitals.lock().unwrap().clone()
    }

    async fn analysis_response(&self, question: Option<&str>) -> Result<AnalysisResponse, ClientError> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_question.lock()? = question.map(str::to_string);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.analysis.lock()?.clone()
    }

    fn vitals_failure(&self) -> Result<(), ClientError> {
        match self.vitals_failure.lock()?.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PatientRepositoryTrait for MockPatientRepository {
    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        Ok(self.patients.lock()?.clone())
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Patient, ClientError> {
        let mut patient = self
            .patients
            .lock()?
            .iter()
            .find(|p| p.patient_id == patient_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Patient not found".to_string()))?;
        patient.recent_vitals = Some(self.get_vitals(patient_id, 5).await?);
        Ok(patient)
    }

    async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, ClientError> {
        let mut patients = self.patients.lock()?;
        let patient_id = request
            .patient_id
            .clone()
            .unwrap_or_else(|| format!("PID-{:03}", patients.len() + 1));
        let patient = Patient::from_request(patient_id, request);
        patients.push(patient.clone());
        Ok(patient)
    }

    async fn update_patient(
        &self,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, ClientError> {
        let mut patients = self.patients.lock()?;
        let patient = patients
            .iter_mut()
            .find(|p| p.patient_id == patient_id)
            .ok_or_else(|| ClientError::NotFound("Patient not found".to_string()))?;
        patient.apply_update(request);
        Ok(patient.clone())
    }

    async fn delete_patient(&self, patient_id: &str) -> Result<(), ClientError> {
        self.patients.lock()?.retain(|p| p.patient_id != patient_id);
        Ok(())
    }

    async fn get_vitals(&self, patient_id: &str, days: u32) -> Result<Vec<VitalRecord>, ClientError> {
        self.vitals_failure()?;
        let rows: Vec<VitalRecord> = self
            .vitals
            .lock()?
            .iter()
            .filter(|row| row.patient_id.as_deref() == Some(patient_id))
            .cloned()
            .collect();
        let skip = rows.len().saturating_sub(days as usize);
        Ok(rows.into_iter().skip(skip).collect())
    }

    async fn add_vitals(&self, patient_id: &str, submission: VitalsSubmission) -> Result<(), ClientError> {
        self.vitals_failure()?;
        self.vitals.lock()?.push(submission.into_record(patient_id));
        Ok(())
    }

    async fn get_graph_data(&self, _patient_id: &str, _days: u32) -> Result<GraphData, ClientError> {
        self.graph_data.lock()?.clone()
    }

    async fn analyze(&self, _patient_id: &str, question: Option<&str>) -> Result<AnalysisResponse, ClientError> {
        self.analysis_response(question).await
    }

    async fn ask(&self, _patient_id: &str, question: &str) -> Result<AnalysisResponse, ClientError> {
        self.analysis_response(Some(question)).await
    }

    async fn probe(&self) -> Result<(), ClientError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.probe_script.lock()?.pop_front();
        match next {
            Some(result) => result,
            None => self.probe_fallback.lock()?.clone(),
        }
    }
}
