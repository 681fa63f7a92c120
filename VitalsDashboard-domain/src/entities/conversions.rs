use chrono::NaiveDate;
use thiserror::Error;
use vitals_dashboard_data::models as data;

use crate::entities::patient::Patient;
use crate::entities::timeseries::TimeSeries;
use crate::entities::vitals::{Metric, VitalRecord};

// Conversion functions between domain entities and data models
// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Wire data that cannot be represented in the domain
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Date format used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date. Timestamps are accepted and cut to their date part.
pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, ConversionError> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|_| ConversionError::InvalidDate(raw.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Convert from data model to domain entity for a stored vitals row.
///
/// Rows that do not name their patient are attributed to `patient_id`.
pub fn convert_to_domain_vital_record(
    data_record: data::VitalRecord,
    patient_id: &str,
) -> Result<VitalRecord, ConversionError> {
    Ok(VitalRecord {
        date: parse_wire_date(&data_record.date)?,
        heart_rate: data_record.heart_beat,
        body_temperature: data_record.body_temperature,
        respiratory_rate: data_record.respiratory_rate,
        blood_pressure: non_blank(data_record.blood_pressure),
        blood_glucose: data_record.blood_glucose,
        patient_id: non_blank(data_record.patient_id).unwrap_or_else(|| patient_id.to_string()),
    })
}

/// Convert from domain entity to data model for a vitals submission
pub fn convert_to_data_vitals_submission(record: &VitalRecord) -> data::VitalsSubmission {
    data::VitalsSubmission {
        date: record.date.format(DATE_FORMAT).to_string(),
        heart_beat: record.heart_rate,
        body_temperature: record.body_temperature,
        respiratory_rate: record.respiratory_rate,
        blood_pressure: record.blood_pressure.clone(),
        blood_glucose: record.blood_glucose,
    }
}

/// Convert from data model to domain entity for a patient
pub fn convert_to_domain_patient(data_patient: data::Patient) -> Patient {
    Patient {
        patient_id: data_patient.patient_id,
        name: data_patient.name,
        age: data_patient.age,
        sex: data_patient.sex,
        department: data_patient.department,
        diagnosis: data_patient.diagnosis,
        treatment: data_patient.treatment,
        condition: data_patient.condition,
        admission_date: data_patient.admission_date,
        expected_discharge_date: data_patient.expected_discharge_date,
    }
}

/// Convert the backend's pre-aligned graph payload into a time series.
///
/// Arrays shorter than `dates` are padded with absent values; longer ones are truncated.
/// Respiratory rate is not part of the payload and stays absent.
pub fn convert_to_domain_time_series(
    graph: data::GraphData,
    metrics: &[Metric],
) -> Result<TimeSeries, ConversionError> {
    let dates = graph
        .dates
        .iter()
        .map(|d| parse_wire_date(d))
        .collect::<Result<Vec<_>, _>>()?;

    let mut series = TimeSeries::with_dates(dates, metrics);
    for metric in metrics {
        let values = match metric {
            Metric::HeartRate => graph.heart_rate.clone(),
            Metric::Temperature => graph.temperature.clone(),
            Metric::Systolic => graph.systolic.clone(),
            Metric::Diastolic => graph.diastolic.clone(),
            Metric::Glucose => graph.glucose.clone(),
            Metric::RespiratoryRate => Vec::new(),
        };
        series.set_values(*metric, values);
    }
    Ok(series)
}
