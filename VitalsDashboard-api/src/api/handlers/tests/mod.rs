// Router-level handler tests. Each test builds the full application over a
// demonstration or scripted repository and drives it with `oneshot`.

mod health_test;
mod session_test;
mod vitals_test;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use vitals_dashboard_data::config::DashboardConfig;
use vitals_dashboard_data::models::VitalRecord;
use vitals_dashboard_data::repository::{DemoPatientRepository, SharedPatientRepository};

use crate::api::{create_application, AppState};

/// Application over the demonstration dataset
pub(super) fn demo_app() -> (Router, AppState) {
    app_with(Arc::new(DemoPatientRepository::new()))
}

pub(super) fn app_with(repository: SharedPatientRepository) -> (Router, AppState) {
    create_application(repository, &DashboardConfig::default())
}

/// Send one request and decode the JSON body (`Null` when empty)
pub(super) async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub(super) fn vitals_row(patient_id: &str, date: &str, heart_beat: i32, blood_pressure: &str) -> VitalRecord {
    VitalRecord {
        date: date.to_string(),
        heart_beat: Some(heart_beat),
        body_temperature: Some(36.8),
        respiratory_rate: Some(16),
        blood_pressure: Some(blood_pressure.to_string()),
        blood_glucose: Some(100),
        patient_id: Some(patient_id.to_string()),
    }
}
