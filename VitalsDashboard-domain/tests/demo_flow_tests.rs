// End-to-end checks of the monitoring services over the demonstration dataset
use std::sync::Arc;
use std::time::Duration;

use vitals_dashboard_data::repository::{DemoPatientRepository, SharedPatientRepository};
use vitals_dashboard_domain::entities::{CriticalReason, Metric, PatientSelection};
use vitals_dashboard_domain::health::{ConnectionState, ConnectivityMonitor};
use vitals_dashboard_domain::services::analysis::ASK_FAILURE_TEXT;
use vitals_dashboard_domain::services::{
    create_default_vitals_service, AnalysisSession, ChartSource, RawVitalsInput,
};

fn demo() -> SharedPatientRepository {
    Arc::new(DemoPatientRepository::new())
}

#[tokio::test]
async fn test_recorded_vitals_show_up_in_table_and_chart() {
    let service = create_default_vitals_service(demo());

    let input = RawVitalsInput {
        date: "2024-01-19".to_string(),
        heart_rate: Some("145".to_string()),
        blood_pressure: Some("185/100".to_string()),
        ..Default::default()
    };
    service.record_vitals("P003", input).await.unwrap();

    let rows = service.vitals_with_status("P003", 5).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].verdict.is_critical());
    assert_eq!(
        rows[1].verdict.reasons(),
        &[CriticalReason::HypertensiveCrisis, CriticalReason::AbnormalHeartRate]
    );

    let chart = service
        .chart("P003", 14, &[Metric::HeartRate, Metric::Systolic], ChartSource::GraphData)
        .await
        .unwrap();
    assert_eq!(chart.len(), 2);
    assert_eq!(chart.values(Metric::HeartRate).unwrap(), &[Some(72.0), Some(145.0)]);
    assert_eq!(chart.values(Metric::Systolic).unwrap(), &[Some(130.0), Some(185.0)]);
}

#[tokio::test]
async fn test_demo_session_answers_with_apology() {
    let session = AnalysisSession::new(demo());
    session.select_patient(Some(PatientSelection::new("P001", Some("John Smith".to_string()))));

    let exchange = session.ask("Any concerns?").await.unwrap();

    assert!(!exchange.succeeded);
    assert_eq!(exchange.answer, ASK_FAILURE_TEXT);
    assert_eq!(session.snapshot().messages.len(), 2);
    assert!(!session.is_awaiting_response());
}

#[tokio::test]
async fn test_demo_backend_is_always_reachable() {
    let monitor = ConnectivityMonitor::new(demo(), "demonstration dataset", Duration::from_secs(30));

    assert_eq!(monitor.probe_once().await, ConnectionState::Connected);
}
