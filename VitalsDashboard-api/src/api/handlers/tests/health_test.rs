use axum::http::{Method, StatusCode};

use super::{demo_app, send};

#[tokio::test]
async fn test_health_is_degraded_until_first_probe() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["backend"]["status"], "degraded");
    assert_eq!(body["components"]["data_source"]["status"], "ok");
    assert_eq!(body["components"]["data_source"]["message"], "Demonstration dataset");
}

#[tokio::test]
async fn test_retry_connects_and_health_recovers() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/connection", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "checking");
    assert!(body["last_checked"].is_null());

    let (status, body) = send(&app, Method::POST, "/api/v1/connection/retry", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "connected");
    assert!(body["last_checked"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let components = body["components"].as_object().unwrap();
    let mut names: Vec<&String> = components.keys().collect();
    names.sort();
    assert_eq!(names, vec!["backend", "data_source"]);
    assert!(body["components"]["backend"]["message"].is_null());
}

#[tokio::test]
async fn test_swagger_document_is_served() {
    let (app, _state) = demo_app();

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Vitals Dashboard API");
}
