// Wire models: the exact JSON shapes exchanged with the backend
pub mod analysis;
pub mod patient;
pub mod vitals;

pub use analysis::{AnalysisResponse, AnalyzeRequest, AskRequest, LlmAnalysis};
pub use patient::{CreatePatientRequest, MedicalHistory, Patient, UpdatePatientRequest};
pub use vitals::{GraphData, VitalRecord, VitalsSubmission};
