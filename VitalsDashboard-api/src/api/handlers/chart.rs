use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, instrument, warn};

use vitals_dashboard_data::config::DEFAULT_GRAPH_DAYS;
use vitals_dashboard_domain::entities::Metric;
use vitals_dashboard_domain::services::ChartSource;

use super::vitals::resolve_days;
use crate::api::state::VitalsService;
use crate::entities::chart::{convert_to_public_chart, ChartQueryParams, ChartResponse};
use crate::entities::common::ErrorResponse;

fn parse_source(source: Option<&str>) -> Result<ChartSource, ErrorResponse> {
    match source.map(str::trim) {
        None | Some("") | Some("graph") => Ok(ChartSource::GraphData),
        Some("vitals") => Ok(ChartSource::Vitals),
        Some(other) => Err(ErrorResponse::validation_error(
            &format!("source: expected \"graph\" or \"vitals\", got \"{}\"", other),
            None,
        )),
    }
}

/// Comma-separated metric names; empty entries are ignored, duplicates collapse
fn parse_metrics(metrics: Option<&str>) -> Result<Vec<Metric>, ErrorResponse> {
    let mut parsed = Vec::new();
    for name in metrics.unwrap_or("").split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let metric = Metric::from_str(name)
            .map_err(|e| ErrorResponse::validation_error(&format!("metrics: {}", e), None))?;
        if !parsed.contains(&metric) {
            parsed.push(metric);
        }
    }

    if parsed.is_empty() {
        parsed.extend_from_slice(&Metric::CHART_DEFAULT);
    }
    Ok(parsed)
}

/// Chart-ready series for a trailing window
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/chart",
    params(
        ("id" = String, Path, description = "Patient ID"),
        ChartQueryParams
    ),
    responses(
        (status = 200, description = "Aligned series", body = ChartResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or failing", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(service))]
pub async fn get_chart(
    State(service): State<VitalsService>,
    Path(id): Path<String>,
    Query(params): Query<ChartQueryParams>,
) -> Result<impl IntoResponse, Response> {
    let days = resolve_days(params.days, DEFAULT_GRAPH_DAYS)?;
    let source = parse_source(params.source.as_deref()).map_err(IntoResponse::into_response)?;
    let metrics = parse_metrics(params.metrics.as_deref()).map_err(IntoResponse::into_response)?;

    match service.chart(&id, days, &metrics, source).await {
        Ok(series) => {
            debug!("Chart for {} has {} dates", id, series.len());
            Ok((StatusCode::OK, Json(convert_to_public_chart(&series))))
        }
        Err(e) => {
            warn!("Failed to build chart for {}: {}", id, e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_default_when_absent_or_blank() {
        assert_eq!(parse_metrics(None).unwrap(), Metric::CHART_DEFAULT.to_vec());
        assert_eq!(parse_metrics(Some(" , ")).unwrap(), Metric::CHART_DEFAULT.to_vec());
    }

    #[test]
    fn test_metrics_accept_aliases_and_collapse_duplicates() {
        let metrics = parse_metrics(Some("glucose, heart_beat,blood_glucose")).unwrap();
        assert_eq!(metrics, vec![Metric::Glucose, Metric::HeartRate]);
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let error = parse_metrics(Some("heart_rate,weight")).unwrap_err();
        assert_eq!(error.error, "validation_error");
        assert!(error.message.contains("weight"));
    }

    #[test]
    fn test_source_values() {
        assert_eq!(parse_source(None).unwrap(), ChartSource::GraphData);
        assert_eq!(parse_source(Some("graph")).unwrap(), ChartSource::GraphData);
        assert_eq!(parse_source(Some("vitals")).unwrap(), ChartSource::Vitals);
        assert!(parse_source(Some("cache")).is_err());
    }
}
