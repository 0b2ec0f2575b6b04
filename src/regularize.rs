//! Series regularizer: Savitzky–Golay smoothing followed by daily resampling.
//!
//! Smoothing runs on the irregular observations; the raw index, the smoothed
//! index and every secondary column are then linearly interpolated onto a
//! gap-free daily grid spanning the first to the last observation.

use crate::core::{RawSeries, Series};
use crate::error::{PhenologyError, Result};
use crate::transform::{daily_dates, interpolate_daily, savgol_filter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fewest observations the smoothing/resampling pipeline will run on.
pub const MIN_OBSERVATIONS: usize = 15;

/// Smoothing parameters for the regularizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegularizeConfig {
    /// Savitzky–Golay window length (odd).
    pub window_size: usize,
    /// Savitzky–Golay polynomial order.
    pub poly_order: usize,
}

impl RegularizeConfig {
    pub fn new(window_size: usize, poly_order: usize) -> Self {
        Self {
            window_size,
            poly_order,
        }
    }

    /// Check the window against the polynomial order and the data length.
    pub fn validate(&self, n_observations: usize) -> Result<()> {
        if self.window_size % 2 == 0 {
            return Err(PhenologyError::InvalidConfiguration(format!(
                "window_size must be odd, got {}",
                self.window_size
            )));
        }
        if self.window_size < self.poly_order + 2 {
            return Err(PhenologyError::InvalidConfiguration(format!(
                "window_size ({}) must be at least poly_order + 2 ({})",
                self.window_size,
                self.poly_order + 2
            )));
        }
        if self.window_size > n_observations {
            return Err(PhenologyError::InvalidConfiguration(format!(
                "window_size ({}) exceeds the number of observations ({})",
                self.window_size, n_observations
            )));
        }
        Ok(())
    }
}

/// Outcome of [`regularize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Regularization {
    /// Smoothed daily series.
    Daily(Series),
    /// Too few observations; the input is handed back untouched.
    Insufficient {
        series: RawSeries,
        needed: usize,
        got: usize,
    },
}

impl Regularization {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Regularization::Insufficient { .. })
    }

    pub fn series(&self) -> Option<&Series> {
        match self {
            Regularization::Daily(series) => Some(series),
            Regularization::Insufficient { .. } => None,
        }
    }

    /// Daily series, or `InsufficientData` for a short-circuited input.
    pub fn into_series(self) -> Result<Series> {
        match self {
            Regularization::Daily(series) => Ok(series),
            Regularization::Insufficient { needed, got, .. } => {
                Err(PhenologyError::InsufficientData { needed, got })
            }
        }
    }
}

/// Smooth and resample a raw observation series to daily cadence.
///
/// Inputs with fewer than [`MIN_OBSERVATIONS`] rows short-circuit to
/// [`Regularization::Insufficient`]. Configuration problems and missing
/// values are errors and are reported before any computation.
pub fn regularize(raw: &RawSeries, config: &RegularizeConfig) -> Result<Regularization> {
    if raw.len() < MIN_OBSERVATIONS {
        tracing::warn!(
            observations = raw.len(),
            needed = MIN_OBSERVATIONS,
            "not enough observations to regularize; returning input unchanged"
        );
        return Ok(Regularization::Insufficient {
            series: raw.clone(),
            needed: MIN_OBSERVATIONS,
            got: raw.len(),
        });
    }
    config.validate(raw.len())?;
    if raw.has_missing_values() {
        return Err(PhenologyError::MissingValues);
    }

    let smoothed = savgol_filter(raw.values(), config.window_size, config.poly_order)?;

    let dates = daily_dates(raw.dates());
    let raw_daily = interpolate_daily(raw.dates(), raw.values())?;
    let smoothed_daily = interpolate_daily(raw.dates(), &smoothed)?;
    let columns = raw
        .columns()
        .iter()
        .map(|(name, values)| Ok((name.clone(), interpolate_daily(raw.dates(), values)?)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        observations = raw.len(),
        days = dates.len(),
        window_size = config.window_size,
        poly_order = config.poly_order,
        "regularized series"
    );

    Ok(Regularization::Daily(Series::from_parts(
        dates,
        raw_daily,
        smoothed_daily,
        columns,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn every_third_day(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n).map(|i| start + Duration::days(3 * i as i64)).collect()
    }

    #[test]
    fn short_series_is_returned_unchanged() {
        let raw = RawSeries::new(every_third_day(14), vec![0.4; 14]).unwrap();
        let out = regularize(&raw, &RegularizeConfig::new(7, 2)).unwrap();

        assert!(out.is_insufficient());
        assert!(out.series().is_none());
        match &out {
            Regularization::Insufficient { series, needed, got } => {
                assert_eq!(series, &raw);
                assert_eq!((*needed, *got), (15, 14));
            }
            Regularization::Daily(_) => unreachable!(),
        }
        assert_eq!(
            out.into_series().unwrap_err(),
            PhenologyError::InsufficientData { needed: 15, got: 14 }
        );
    }

    #[test]
    fn produces_gap_free_daily_series() {
        let n = 20;
        let values: Vec<f64> = (0..n).map(|i| 0.2 + 0.02 * i as f64).collect();
        let raw = RawSeries::new(every_third_day(n), values)
            .unwrap()
            .with_column("evi", (0..n).map(|i| i as f64).collect())
            .unwrap();
        let series = regularize(&raw, &RegularizeConfig::new(5, 2))
            .unwrap()
            .into_series()
            .unwrap();

        assert_eq!(series.len(), 3 * (n - 1) + 1);
        for w in series.dates().windows(2) {
            assert_eq!(w[1] - w[0], Duration::days(1));
        }
        // Linear input survives smoothing; interpolation stays on the line.
        for (i, v) in series.smoothed().iter().enumerate() {
            assert_relative_eq!(*v, 0.2 + 0.02 * i as f64 / 3.0, epsilon = 1e-9);
        }
        let evi = series.column("evi").unwrap();
        assert_relative_eq!(evi[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(evi[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_window_is_rejected_before_smoothing() {
        let raw = RawSeries::new(every_third_day(16), vec![0.5; 16]).unwrap();
        for config in [
            RegularizeConfig::new(6, 2),
            RegularizeConfig::new(3, 2),
            RegularizeConfig::new(17, 2),
        ] {
            assert!(matches!(
                regularize(&raw, &config),
                Err(PhenologyError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn missing_values_are_rejected() {
        let mut values = vec![0.5; 16];
        values[4] = f64::NAN;
        let raw = RawSeries::new(every_third_day(16), values).unwrap();
        assert_eq!(
            regularize(&raw, &RegularizeConfig::new(5, 2)).unwrap_err(),
            PhenologyError::MissingValues
        );
    }
}
