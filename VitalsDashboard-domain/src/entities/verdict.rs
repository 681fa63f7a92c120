use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Why a vital record was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalReason {
    HighFever,
    VeryHighGlucose,
    HypertensiveCrisis,
    AbnormalHeartRate,
}

impl CriticalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalReason::HighFever => "High fever",
            CriticalReason::VeryHighGlucose => "Very high glucose",
            CriticalReason::HypertensiveCrisis => "Hypertensive crisis",
            CriticalReason::AbnormalHeartRate => "Abnormal heart rate",
        }
    }
}

impl fmt::Display for CriticalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CriticalReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Normal/Critical classification of a vital record.
///
/// Critical exactly when at least one reason is present; there is no separate flag to drift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdVerdict {
    reasons: Vec<CriticalReason>,
}

impl ThresholdVerdict {
    pub fn from_reasons(reasons: Vec<CriticalReason>) -> Self {
        Self { reasons }
    }

    pub fn is_critical(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Reasons in rule order
    pub fn reasons(&self) -> &[CriticalReason] {
        &self.reasons
    }
}

impl Serialize for ThresholdVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ThresholdVerdict", 2)?;
        state.serialize_field("is_critical", &self.is_critical())?;
        state.serialize_field("reasons", &self.reasons)?;
        state.end()
    }
}
