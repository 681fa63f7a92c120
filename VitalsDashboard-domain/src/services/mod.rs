pub mod analysis;
pub mod normalizer;
pub mod thresholds;
pub mod timeseries;
pub mod vitals;

// Domain services
// Pure monitoring logic (normalizer, thresholds, alignment) plus the services that drive the backend.

// Re-export service traits and factory functions
pub use analysis::{AnalysisSession, SessionError, SessionSnapshot, SharedAnalysisSession};
pub use normalizer::{normalize_vitals, NormalizationError, RawVitalsInput};
pub use thresholds::evaluate_thresholds;
pub use timeseries::align_vitals;
pub use vitals::{create_default_vitals_service, ChartSource, VitalsServiceError, VitalsServiceTrait};
