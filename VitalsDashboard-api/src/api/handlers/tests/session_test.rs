use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::sync::Notify;

use vitals_dashboard_data::models::{AnalysisResponse, LlmAnalysis};
use vitals_dashboard_data::repository::demo_patients;
use vitals_dashboard_data::repository::mock::MockPatientRepository;
use vitals_dashboard_domain::services::analysis::{ANALYZE_FAILURE_TEXT, ANALYZE_QUESTION};

use super::{app_with, demo_app, send};

fn answering(answer: &str) -> MockPatientRepository {
    MockPatientRepository::new()
        .with_patients(demo_patients())
        .with_analysis(AnalysisResponse {
            patient_id: "P001".to_string(),
            llm_analysis: LlmAnalysis {
                answer_to_question: Some(answer.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
}

#[tokio::test]
async fn test_ask_without_selection_is_rejected() {
    let repository = Arc::new(answering("unused"));
    let (app, _state) = app_with(repository.clone());

    let (status, body) = send(&app, Method::POST, "/api/v1/session/ask", Some(json!({ "question": "How is he?" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(repository.analysis_calls(), 0);
}

#[tokio::test]
async fn test_selecting_unknown_patient_is_not_found() {
    let (app, state) = demo_app();

    let (status, _body) = send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P999" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.session.selected_patient().is_none());
}

#[tokio::test]
async fn test_ask_appends_question_and_answer() {
    let repository = Arc::new(answering("Blood pressure is elevated but stable."));
    let (app, _state) = app_with(repository.clone());

    let (status, body) = send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P001" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_patient"]["patient_name"], "John Smith");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/session/ask",
        Some(json!({ "question": "How is the blood pressure?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], true);
    assert_eq!(body["answer"], "Blood pressure is elevated but stable.");
    assert_eq!(repository.last_question().as_deref(), Some("How is the blood pressure?"));

    let (_, session) = send(&app, Method::GET, "/api/v1/session", None).await;
    let messages = session["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["author"], "user");
    assert_eq!(messages[1]["author"], "assistant");
    assert_eq!(messages[1]["patient_id"], "P001");
    assert_eq!(session["awaiting_response"], false);
}

#[tokio::test]
async fn test_blank_question_is_rejected() {
    let repository = Arc::new(answering("unused"));
    let (app, _state) = app_with(repository.clone());
    send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P001" }))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/session/ask", Some(json!({ "question": "   " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(repository.analysis_calls(), 0);
}

#[tokio::test]
async fn test_demo_analysis_degrades_to_apology() {
    let (app, _state) = demo_app();
    send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P002" }))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/session/analyze", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], false);
    assert_eq!(body["question"], ANALYZE_QUESTION);
    assert_eq!(body["answer"], ANALYZE_FAILURE_TEXT);
}

#[tokio::test]
async fn test_second_request_while_pending_conflicts() {
    let gate = Arc::new(Notify::new());
    let repository = Arc::new(answering("Done.").with_gate(gate.clone()));
    let (app, state) = app_with(repository.clone());
    send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P001" }))).await;

    let mut updates = state.session.subscribe();
    let first = tokio::spawn({
        let app = app.clone();
        async move { send(&app, Method::POST, "/api/v1/session/analyze", None).await }
    });
    updates.wait_for(|s| s.awaiting_response).await.unwrap();

    let (status, body) = send(&app, Method::POST, "/api/v1/session/ask", Some(json!({ "question": "Still there?" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    gate.notify_one();
    let (status, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], true);
    assert_eq!(repository.analysis_calls(), 1);
    assert!(!state.session.is_awaiting_response());
}

#[tokio::test]
async fn test_clear_keeps_selection() {
    let (app, _state) = app_with(Arc::new(answering("Stable.")));
    send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": "P001" }))).await;
    send(&app, Method::POST, "/api/v1/session/ask", Some(json!({ "question": "Trend?" }))).await;

    let (status, _) = send(&app, Method::DELETE, "/api/v1/session/messages", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, session) = send(&app, Method::GET, "/api/v1/session", None).await;
    assert_eq!(session["messages"], json!([]));
    assert_eq!(session["selected_patient"]["patient_id"], "P001");

    let (_, session) = send(&app, Method::PUT, "/api/v1/session/patient", Some(json!({ "patient_id": null }))).await;
    assert!(session["selected_patient"].is_null());
}
