use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One dated observation of a patient's vital signs.
///
/// Every clinical field is optional: `None` means "not measured that day",
/// which is different from a measured value of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct VitalRecord {
    /// Observation date
    pub date: NaiveDate,

    /// Heart rate in beats per minute
    #[validate(range(min = 1, max = 300, message = "Heart rate must be between 1 and 300 bpm"))]
    pub heart_rate: Option<i32>,

    /// Body temperature in degrees Celsius
    #[validate(range(min = 25.0, max = 45.0, message = "Body temperature must be between 25.0 and 45.0 °C"))]
    pub body_temperature: Option<f64>,

    /// Breaths per minute
    #[validate(range(min = 1, max = 100, message = "Respiratory rate must be between 1 and 100 breaths/min"))]
    pub respiratory_rate: Option<i32>,

    /// `<systolic>/<diastolic>` in mmHg
    pub blood_pressure: Option<String>,

    /// Blood glucose in mg/dL
    #[validate(range(min = 1, max = 2000, message = "Blood glucose must be between 1 and 2000 mg/dL"))]
    pub blood_glucose: Option<i32>,

    /// Owning patient
    pub patient_id: String,
}

impl VitalRecord {
    /// An empty record for a patient on a date
    pub fn new(patient_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            date,
            heart_rate: None,
            body_temperature: None,
            respiratory_rate: None,
            blood_pressure: None,
            blood_glucose: None,
            patient_id: patient_id.into(),
        }
    }

    /// Blood pressure split into its two readings, if the stored text parses
    pub fn parsed_blood_pressure(&self) -> Option<BloodPressure> {
        self.blood_pressure.as_deref().and_then(BloodPressure::parse)
    }
}

/// A blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    /// Parse `<systolic>/<diastolic>`, tolerating whitespace around either number.
    ///
    /// Returns `None` for anything else (missing slash, non-numeric parts).
    pub fn parse(text: &str) -> Option<Self> {
        let (systolic, diastolic) = text.split_once('/')?;
        Some(Self {
            systolic: systolic.trim().parse().ok()?,
            diastolic: diastolic.trim().parse().ok()?,
        })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// A chartable metric derived from a vital record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "heart_rate")]
    HeartRate,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "respiratory_rate")]
    RespiratoryRate,
    #[serde(rename = "systolic")]
    Systolic,
    #[serde(rename = "diastolic")]
    Diastolic,
    #[serde(rename = "glucose")]
    Glucose,
}

impl Metric {
    /// Every metric, in display order
    pub const ALL: [Metric; 6] = [
        Metric::HeartRate,
        Metric::Temperature,
        Metric::RespiratoryRate,
        Metric::Systolic,
        Metric::Diastolic,
        Metric::Glucose,
    ];

    /// Metrics the vitals charts show when none are requested
    pub const CHART_DEFAULT: [Metric; 5] = [
        Metric::HeartRate,
        Metric::Temperature,
        Metric::Systolic,
        Metric::Diastolic,
        Metric::Glucose,
    ];

    /// Wire name of the metric
    pub fn name(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heart_rate",
            Metric::Temperature => "temperature",
            Metric::RespiratoryRate => "respiratory_rate",
            Metric::Systolic => "systolic",
            Metric::Diastolic => "diastolic",
            Metric::Glucose => "glucose",
        }
    }

    /// Value of this metric in a record. Blood pressure halves are absent when the text does not parse.
    pub fn value_of(&self, record: &VitalRecord) -> Option<f64> {
        match self {
            Metric::HeartRate => record.heart_rate.map(f64::from),
            Metric::Temperature => record.body_temperature,
            Metric::RespiratoryRate => record.respiratory_rate.map(f64::from),
            Metric::Systolic => record.parsed_blood_pressure().map(|bp| f64::from(bp.systolic)),
            Metric::Diastolic => record.parsed_blood_pressure().map(|bp| f64::from(bp.diastolic)),
            Metric::Glucose => record.blood_glucose.map(f64::from),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heart_rate" | "heart_beat" => Ok(Metric::HeartRate),
            "temperature" | "body_temperature" => Ok(Metric::Temperature),
            "respiratory_rate" => Ok(Metric::RespiratoryRate),
            "systolic" => Ok(Metric::Systolic),
            "diastolic" => Ok(Metric::Diastolic),
            "glucose" | "blood_glucose" => Ok(Metric::Glucose),
            other => Err(format!("Unknown metric: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_blood_pressure_parse() {
        assert_eq!(
            BloodPressure::parse("120/80"),
            Some(BloodPressure { systolic: 120, diastolic: 80 })
        );
        assert_eq!(
            BloodPressure::parse(" 135 / 85 "),
            Some(BloodPressure { systolic: 135, diastolic: 85 })
        );
        assert_eq!(BloodPressure::parse("abc/def"), None);
        assert_eq!(BloodPressure::parse("12080"), None);
        assert_eq!(BloodPressure::parse("120/"), None);
    }

    #[test]
    fn test_metric_values_from_record() {
        let mut record = VitalRecord::new("P001", date("2024-01-18"));
        record.heart_rate = Some(78);
        record.blood_pressure = Some("140/90".to_string());

        assert_eq!(Metric::HeartRate.value_of(&record), Some(78.0));
        assert_eq!(Metric::Systolic.value_of(&record), Some(140.0));
        assert_eq!(Metric::Diastolic.value_of(&record), Some(90.0));
        assert_eq!(Metric::Temperature.value_of(&record), None);
    }

    #[test]
    fn test_unparsable_blood_pressure_has_no_halves() {
        let mut record = VitalRecord::new("P001", date("2024-01-18"));
        record.blood_pressure = Some("high".to_string());

        assert_eq!(Metric::Systolic.value_of(&record), None);
        assert_eq!(Metric::Diastolic.value_of(&record), None);
    }

    #[test]
    fn test_metric_names_round_trip_through_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
        }
        assert_eq!("heart_beat".parse::<Metric>(), Ok(Metric::HeartRate));
        assert!("oxygen".parse::<Metric>().is_err());
    }

    #[test]
    fn test_range_validation() {
        let mut record = VitalRecord::new("P001", date("2024-01-18"));
        record.heart_rate = Some(72);
        record.body_temperature = Some(36.8);
        assert!(record.validate().is_ok());

        record.body_temperature = Some(98.6);
        let errors = record.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body_temperature"));
    }
}
