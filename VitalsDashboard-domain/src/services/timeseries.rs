use crate::entities::timeseries::TimeSeries;
use crate::entities::vitals::{Metric, VitalRecord};

/// Reshape per-date records into parallel series, one position per record.
///
/// Records must already be sorted ascending by date and filtered to the wanted
/// window; no re-sorting or de-duplication happens here. Position `i` of each
/// metric holds that metric's value from record `i`, or `None` when it was not
/// measured. Empty input yields empty dates and an empty sequence per metric.
pub fn align_vitals(records: &[VitalRecord], metrics: &[Metric]) -> TimeSeries {
    let dates = records.iter().map(|r| r.date).collect();
    let mut series = TimeSeries::with_dates(dates, metrics);

    for metric in metrics {
        let values = records.iter().map(|r| metric.value_of(r)).collect();
        series.set_values(*metric, values);
    }

    series
}
