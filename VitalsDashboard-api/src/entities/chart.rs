use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use vitals_dashboard_domain::entities::TimeSeries;

/// Query parameters for chart data
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ChartQueryParams {
    /// Trailing window in days (default: 14)
    pub days: Option<u32>,

    /// `graph` for the backend's pre-aligned data (falls back to raw vitals), `vitals` to align raw vitals
    pub source: Option<String>,

    /// Comma-separated metric names (default: heart_rate,temperature,systolic,diastolic,glucose)
    pub metrics: Option<String>,
}

/// One metric's values, aligned position-for-position with `dates`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    #[schema(example = "heart_rate")]
    pub metric: String,
    pub values: Vec<Option<f64>>,
}

/// Parallel per-metric series over a shared date axis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartResponse {
    /// Observation dates (YYYY-MM-DD)
    pub dates: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// False when there is nothing to plot
    pub has_data: bool,
}

/// Convert a domain time series to the public chart payload
pub fn convert_to_public_chart(series: &TimeSeries) -> ChartResponse {
    ChartResponse {
        dates: series.dates().iter().map(|d| d.to_string()).collect(),
        series: series
            .iter()
            .map(|(metric, values)| ChartSeries {
                metric: metric.name().to_string(),
                values: values.to_vec(),
            })
            .collect(),
        has_data: series.has_data(),
    }
}
