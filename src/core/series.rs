//! Raw observation series and the regularized daily series.

use crate::error::{PhenologyError, Result};
use chrono::{Duration, NaiveDate};
use std::ops::Range;

/// Irregularly spaced vegetation-index observations, one per satellite pass.
///
/// Dates are strictly increasing. Secondary columns (e.g. EVI next to NDVI)
/// are carried along and interpolated by the regularizer, never smoothed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl RawSeries {
    /// Create a raw series from already ordered, deduplicated observations.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        validate_increasing(&dates)?;

        Ok(Self {
            dates,
            values,
            columns: Vec::new(),
        })
    }

    /// Build a raw series from unordered acquisition output.
    ///
    /// Drops non-finite values and rows equal to `fill_value`, sorts by
    /// date and keeps the first observation of each duplicated date.
    /// Returns [`PhenologyError::EmptyData`] when nothing survives.
    pub fn from_unsorted(
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        fill_value: Option<f64>,
    ) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }

        let mut rows: Vec<(NaiveDate, f64)> = dates
            .into_iter()
            .zip(values)
            .filter(|(_, v)| v.is_finite() && fill_value.map_or(true, |fill| *v != fill))
            .collect();
        // Stable sort keeps acquisition order among equal dates.
        rows.sort_by_key(|(date, _)| *date);
        rows.dedup_by_key(|(date, _)| *date);
        if rows.is_empty() {
            return Err(PhenologyError::EmptyData);
        }

        let (dates, values) = rows.into_iter().unzip();
        Ok(Self {
            dates,
            values,
            columns: Vec::new(),
        })
    }

    /// Attach a secondary index column aligned with the observation dates.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.dates.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: self.dates.len(),
                got: values.len(),
            });
        }
        self.columns.push((name.into(), values));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Primary index values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Secondary column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// All secondary columns in insertion order.
    pub fn columns(&self) -> &[(String, Vec<f64>)] {
        &self.columns
    }

    /// Check for NaN or infinite values in any column.
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
            || self
                .columns
                .iter()
                .any(|(_, col)| col.iter().any(|v| !v.is_finite()))
    }
}

/// One day of the regularized series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub raw_index: f64,
    pub smoothed_index: f64,
}

/// Gap-free daily series produced by the regularizer.
///
/// Invariant: one entry per calendar day, strictly increasing. Later stages
/// only index into it, so positions map to dates by plain day arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    raw: Vec<f64>,
    smoothed: Vec<f64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl Series {
    /// Create a daily series, validating the one-row-per-day invariant.
    pub fn new(dates: Vec<NaiveDate>, raw: Vec<f64>, smoothed: Vec<f64>) -> Result<Self> {
        if raw.len() != dates.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: dates.len(),
                got: raw.len(),
            });
        }
        if smoothed.len() != dates.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: dates.len(),
                got: smoothed.len(),
            });
        }
        for w in dates.windows(2) {
            if w[1] - w[0] != Duration::days(1) {
                return Err(PhenologyError::TimestampError(format!(
                    "series must be daily without gaps: {} follows {}",
                    w[1], w[0]
                )));
            }
        }

        Ok(Self {
            dates,
            raw,
            smoothed,
            columns: Vec::new(),
        })
    }

    /// Assemble a series whose dates are already known to be daily.
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        raw: Vec<f64>,
        smoothed: Vec<f64>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Self {
        debug_assert_eq!(dates.len(), raw.len());
        debug_assert_eq!(dates.len(), smoothed.len());
        Self {
            dates,
            raw,
            smoothed,
            columns,
        }
    }

    /// Attach a secondary column aligned with the daily dates.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.dates.len() {
            return Err(PhenologyError::DimensionMismatch {
                expected: self.dates.len(),
                got: values.len(),
            });
        }
        self.columns.push((name.into(), values));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Raw index interpolated to the daily grid.
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Savitzky–Golay smoothed index interpolated to the daily grid.
    pub fn smoothed(&self) -> &[f64] {
        &self.smoothed
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn columns(&self) -> &[(String, Vec<f64>)] {
        &self.columns
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// The day at `index`, if in range.
    pub fn point(&self, index: usize) -> Option<TimePoint> {
        Some(TimePoint {
            date: *self.dates.get(index)?,
            raw_index: self.raw[index],
            smoothed_index: self.smoothed[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = TimePoint> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i))
    }

    /// Position of `date` in the series.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.first_date()?;
        let offset = (date - first).num_days();
        if offset < 0 {
            return None;
        }
        let offset = offset as usize;
        (offset < self.len()).then_some(offset)
    }

    /// Index range of the rows whose date lies in the closed `[start, end]`.
    ///
    /// Empty when `start > end` or the window misses the series entirely.
    pub fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Range<usize> {
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return 0..0;
        };
        let lo = start.max(first);
        let hi = end.min(last);
        if lo > hi {
            return 0..0;
        }
        let lo = (lo - first).num_days() as usize;
        let hi = (hi - first).num_days() as usize;
        lo..hi + 1
    }
}

fn validate_increasing(dates: &[NaiveDate]) -> Result<()> {
    for w in dates.windows(2) {
        if w[1] <= w[0] {
            return Err(PhenologyError::TimestampError(format!(
                "dates must be strictly increasing: {} follows {}",
                w[1], w[0]
            )));
        }
    }
    Ok(())
}
