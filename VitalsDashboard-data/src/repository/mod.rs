// Repository module structure
pub mod errors;
mod demo;
mod http;
mod patients;

// Re-export commonly used types
pub use errors::ClientError;
pub use demo::{demo_patients, DemoPatientRepository};
pub use http::HttpPatientRepository;
pub use patients::{create_patient_repository, PatientRepositoryTrait, SharedPatientRepository};

// Scriptable repository for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub mod mock;
