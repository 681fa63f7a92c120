use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use vitals_dashboard_data::repository::mock::MockPatientRepository;
use vitals_dashboard_data::repository::ClientError;

use super::{app_with, demo_app, send, vitals_row};

#[tokio::test]
async fn test_recorded_vitals_are_normalized_and_assessed() {
    let (app, _state) = demo_app();

    let submission = json!({
        "date": "2024-01-20",
        "heart_rate": "88",
        "body_temperature": " 39.5 ",
        "blood_pressure": "150 / 95",
        "blood_glucose": ""
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/patients/P001/vitals", Some(submission)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["blood_pressure"], "150/95");
    assert!(body["record"]["blood_glucose"].is_null());
    assert_eq!(body["status"]["reasons"], json!(["High fever"]));

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/vitals?days=10", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["status"]["is_critical"], false);
    assert_eq!(rows[1]["record"]["date"], "2024-01-20");
    assert_eq!(rows[1]["status"]["is_critical"], true);
}

#[tokio::test]
async fn test_invalid_submission_is_rejected_before_storage() {
    let repository = Arc::new(MockPatientRepository::new());
    let (app, _state) = app_with(repository.clone());

    let submission = json!({ "date": "2024-01-20", "blood_pressure": "80/120" });
    let (status, body) = send(&app, Method::POST, "/api/v1/patients/P001/vitals", Some(submission)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("blood_pressure"));
    assert!(repository.stored_vitals().is_empty());
}

#[tokio::test]
async fn test_vitals_for_unknown_demo_patient_is_not_found() {
    let (app, _state) = demo_app();

    let submission = json!({ "date": "2024-01-20", "heart_rate": "70" });
    let (status, _body) = send(&app, Method::POST, "/api/v1/patients/P999/vitals", Some(submission)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_day_window_is_rejected() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/vitals?days=0", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_vitals_backend_failure_keeps_message() {
    let repository = MockPatientRepository::new().with_vitals_failure(ClientError::Service {
        status: 500,
        message: "HTTP 500: Internal Server Error".to_string(),
    });
    let (app, _state) = app_with(Arc::new(repository));

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/vitals", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "backend_error");
    assert_eq!(body["message"], "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_demo_chart_falls_back_to_aligned_vitals() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/chart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], json!(["2024-01-18"]));
    assert_eq!(body["has_data"], true);
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 5);
    assert_eq!(series[2]["metric"], "systolic");
    assert_eq!(series[2]["values"], json!([140.0]));
}

#[tokio::test]
async fn test_chart_keeps_gaps_and_requested_metrics() {
    let mut unparsable = vitals_row("P001", "2024-01-19", 90, "n/a");
    unparsable.heart_beat = None;
    let repository = MockPatientRepository::new().with_vitals(vec![
        vitals_row("P001", "2024-01-18", 80, "120/80"),
        unparsable,
    ]);
    let (app, _state) = app_with(Arc::new(repository));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/patients/P001/chart?source=vitals&metrics=heart_rate,diastolic",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], json!(["2024-01-18", "2024-01-19"]));
    assert_eq!(body["series"][0]["values"], json!([80.0, null]));
    assert_eq!(body["series"][1]["metric"], "diastolic");
    assert_eq!(body["series"][1]["values"], json!([80.0, null]));
}

#[tokio::test]
async fn test_chart_without_vitals_has_no_data() {
    let (app, _state) = app_with(Arc::new(MockPatientRepository::new()));

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/chart?source=vitals", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], json!([]));
    assert_eq!(body["has_data"], false);
}

#[tokio::test]
async fn test_chart_rejects_unknown_metric() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/patients/P001/chart?metrics=weight", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("weight"));
}
