use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::vitals::Metric;

/// Date-aligned series for several metrics.
///
/// Every metric sequence has exactly `dates.len()` positions; a position is
/// `None` when nothing was measured for that metric on that date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    series: IndexMap<Metric, Vec<Option<f64>>>,
}

impl TimeSeries {
    /// A series with no dates and an empty sequence per metric
    pub fn empty(metrics: &[Metric]) -> Self {
        Self::with_dates(Vec::new(), metrics)
    }

    /// A series over `dates` with every requested metric fully absent
    pub fn with_dates(dates: Vec<NaiveDate>, metrics: &[Metric]) -> Self {
        let len = dates.len();
        let series = metrics.iter().map(|m| (*m, vec![None; len])).collect();
        Self { dates, series }
    }

    /// Replace a metric's values, padding with `None` or truncating to fit the dates
    pub fn set_values(&mut self, metric: Metric, mut values: Vec<Option<f64>>) {
        values.resize(self.dates.len(), None);
        self.series.insert(metric, values);
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self, metric: Metric) -> Option<&[Option<f64>]> {
        self.series.get(&metric).map(Vec::as_slice)
    }

    /// Metrics in request order
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &[Option<f64>])> + '_ {
        self.series.iter().map(|(m, v)| (*m, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whether anything is worth charting; empty input must render a "no data" state
    pub fn has_data(&self) -> bool {
        !self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_set_values_pads_and_truncates() {
        let mut series = TimeSeries::with_dates(
            vec![date("2024-01-17"), date("2024-01-18"), date("2024-01-19")],
            &[Metric::HeartRate, Metric::Glucose],
        );

        series.set_values(Metric::HeartRate, vec![Some(70.0)]);
        series.set_values(Metric::Glucose, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);

        assert_eq!(series.values(Metric::HeartRate).unwrap(), &[Some(70.0), None, None]);
        assert_eq!(series.values(Metric::Glucose).unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_empty_series_keeps_requested_metrics() {
        let series = TimeSeries::empty(&[Metric::Systolic, Metric::Diastolic]);

        assert!(!series.has_data());
        assert_eq!(series.metrics().collect::<Vec<_>>(), vec![Metric::Systolic, Metric::Diastolic]);
        assert_eq!(series.values(Metric::Systolic).unwrap().len(), 0);
    }
}
