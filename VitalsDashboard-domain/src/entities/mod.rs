pub mod analysis;
pub mod conversions;
pub mod patient;
pub mod timeseries;
pub mod verdict;
pub mod vitals;

// Re-export common types for easier imports
pub use analysis::{AnalysisExchange, ChatMessage, MessageAuthor, PatientSelection};
pub use patient::{AssessedVitalRecord, Patient, PatientOverview};
pub use timeseries::TimeSeries;
pub use verdict::{CriticalReason, ThresholdVerdict};
pub use vitals::{BloodPressure, Metric, VitalRecord};
