//! Resampling of irregular observations onto a daily grid.

use crate::error::{PhenologyError, Result};
use chrono::NaiveDate;

/// Every calendar day from the first to the last observation, inclusive.
pub fn daily_dates(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    match (dates.first(), dates.last()) {
        (Some(&first), Some(&last)) => first
            .iter_days()
            .take_while(|d| *d <= last)
            .collect(),
        _ => Vec::new(),
    }
}

/// Linearly interpolate `values` observed on `dates` onto the daily grid.
///
/// Observed days keep their value exactly; there is no extrapolation past
/// the first or last observation.
pub fn interpolate_daily(dates: &[NaiveDate], values: &[f64]) -> Result<Vec<f64>> {
    if dates.len() != values.len() {
        return Err(PhenologyError::DimensionMismatch {
            expected: dates.len(),
            got: values.len(),
        });
    }
    let Some(&last) = values.last() else {
        return Ok(Vec::new());
    };

    let mut daily = Vec::new();
    for (d, v) in dates.windows(2).zip(values.windows(2)) {
        let gap = (d[1] - d[0]).num_days();
        if gap <= 0 {
            return Err(PhenologyError::TimestampError(format!(
                "dates must be strictly increasing: {} follows {}",
                d[1], d[0]
            )));
        }
        let step = (v[1] - v[0]) / gap as f64;
        daily.extend((0..gap).map(|k| v[0] + step * k as f64));
    }
    daily.push(last);

    Ok(daily)
}

/// Resample one column onto the daily grid, returning the grid and values.
pub fn resample_daily(dates: &[NaiveDate], values: &[f64]) -> Result<(Vec<NaiveDate>, Vec<f64>)> {
    let daily = interpolate_daily(dates, values)?;
    let grid = daily_dates(dates);
    debug_assert_eq!(grid.len(), daily.len());
    Ok((grid, daily))
}

/// Number of whole days from `start` to `end` (negative when `end` is earlier).
pub fn days_between_dates(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
