use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::entities::conversions::DATE_FORMAT;
use crate::entities::vitals::{BloodPressure, VitalRecord};

/// Normalization errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizationError {
    /// No patient was given to attach the record to
    #[error("A patient must be selected before recording vitals")]
    MissingPatient,

    /// A field is malformed or implausible
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Vitals exactly as typed into the entry form.
///
/// Every clinical field is free text; blank or missing means "not measured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVitalsInput {
    pub date: String,
    #[serde(default)]
    pub heart_rate: Option<String>,
    #[serde(default)]
    pub body_temperature: Option<String>,
    #[serde(default)]
    pub respiratory_rate: Option<String>,
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub blood_glucose: Option<String>,
}

/// Validate and coerce a raw submission into a canonical vital record
pub fn normalize_vitals(patient_id: &str, input: &RawVitalsInput) -> Result<VitalRecord, NormalizationError> {
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Err(NormalizationError::MissingPatient);
    }

    let date = NaiveDate::parse_from_str(input.date.trim(), DATE_FORMAT).map_err(|_| {
        NormalizationError::Validation("date: must be a calendar date in YYYY-MM-DD format".to_string())
    })?;

    let body_temperature = parse_field::<f64>("body_temperature", &input.body_temperature)?;
    if body_temperature.is_some_and(|t| !t.is_finite()) {
        return Err(NormalizationError::Validation(
            "body_temperature: must be a number".to_string(),
        ));
    }

    let record = VitalRecord {
        date,
        heart_rate: parse_field("heart_rate", &input.heart_rate)?,
        body_temperature,
        respiratory_rate: parse_field("respiratory_rate", &input.respiratory_rate)?,
        blood_pressure: normalize_blood_pressure(&input.blood_pressure)?,
        blood_glucose: parse_field("blood_glucose", &input.blood_glucose)?,
        patient_id: patient_id.to_string(),
    };

    record
        .validate()
        .map_err(|errors| NormalizationError::Validation(describe_validation_errors(&errors)))?;

    Ok(record)
}

/// Blank means absent; anything else must parse
fn parse_field<T: FromStr>(field: &str, raw: &Option<String>) -> Result<Option<T>, NormalizationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| NormalizationError::Validation(format!("{}: must be a number", field))),
    }
}

/// Canonical `S/D` form with all whitespace removed
fn normalize_blood_pressure(raw: &Option<String>) -> Result<Option<String>, NormalizationError> {
    let compact: String = match raw {
        Some(text) => text.chars().filter(|c| !c.is_whitespace()).collect(),
        None => return Ok(None),
    };
    if compact.is_empty() {
        return Ok(None);
    }

    let reading = BloodPressure::parse(&compact).ok_or_else(|| {
        NormalizationError::Validation(
            "blood_pressure: must be written as <systolic>/<diastolic>, e.g. 120/80".to_string(),
        )
    })?;

    if reading.systolic <= reading.diastolic {
        return Err(NormalizationError::Validation(
            "blood_pressure: systolic pressure must be greater than diastolic pressure".to_string(),
        ));
    }

    Ok(Some(reading.to_string()))
}

fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
