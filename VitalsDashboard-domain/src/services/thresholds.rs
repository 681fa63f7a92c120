use crate::entities::verdict::{CriticalReason, ThresholdVerdict};
use crate::entities::vitals::VitalRecord;

/// Temperature at or above which a reading is a high fever (°C)
pub const FEVER_THRESHOLD_C: f64 = 39.0;
/// Glucose at or above which a reading is very high (mg/dL)
pub const GLUCOSE_THRESHOLD: i32 = 300;
/// Systolic pressure at or above which a reading is a hypertensive crisis (mmHg)
pub const CRISIS_SYSTOLIC: u16 = 180;
/// Diastolic pressure at or above which a reading is a hypertensive crisis (mmHg)
pub const CRISIS_DIASTOLIC: u16 = 120;
/// Heart rate at or above which a reading is abnormal (bpm)
pub const HEART_RATE_HIGH: i32 = 140;
/// Heart rate at or below which a reading is abnormal (bpm)
pub const HEART_RATE_LOW: i32 = 30;

/// Classify a vital record against the clinical safety thresholds.
///
/// Every rule is checked and every match is reported, in rule order.
/// Absent fields and unparsable blood pressure text never contribute a reason.
pub fn evaluate_thresholds(record: &VitalRecord) -> ThresholdVerdict {
    let mut reasons = Vec::new();

    if record.body_temperature.is_some_and(|t| t >= FEVER_THRESHOLD_C) {
        reasons.push(CriticalReason::HighFever);
    }

    if record.blood_glucose.is_some_and(|g| g >= GLUCOSE_THRESHOLD) {
        reasons.push(CriticalReason::VeryHighGlucose);
    }

    if let Some(bp) = record.parsed_blood_pressure() {
        if bp.systolic >= CRISIS_SYSTOLIC || bp.diastolic >= CRISIS_DIASTOLIC {
            reasons.push(CriticalReason::HypertensiveCrisis);
        }
    }

    if record
        .heart_rate
        .is_some_and(|hr| hr >= HEART_RATE_HIGH || hr <= HEART_RATE_LOW)
    {
        reasons.push(CriticalReason::AbnormalHeartRate);
    }

    ThresholdVerdict::from_reasons(reasons)
}
