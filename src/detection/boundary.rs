//! Beginning/end-of-season detection inside the dominant cycle.
//!
//! Two independent policies run over the closed `[vos_start, vos_end]`
//! interval of the daily series:
//! - derivative: steepest day-over-day rise (`bos_der`) and, from the peak
//!   onwards, steepest fall (`eos_der`);
//! - absolute: the two days whose smoothed index is nearest the threshold,
//!   earlier one `bos_abs`, later one `eos_abs`.

use crate::core::{EventCollection, EventLabel, PhenologicalEvent, Series};
use crate::error::{PhenologyError, Result};
use crate::utils::{argmax, argmin};
use std::cmp::Ordering;

/// Day-over-day change; the first element is defined as zero.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    std::iter::once(0.0)
        .chain(values.windows(2).map(|w| w[1] - w[0]))
        .collect()
}

/// Positions (in the daily series) of the four season boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryIndices {
    pub bos_der: usize,
    pub eos_der: usize,
    pub bos_abs: usize,
    pub eos_abs: usize,
}

/// Locate the season boundaries for the cycle recorded in `events`.
pub fn find_season_boundaries(
    series: &Series,
    events: &EventCollection,
    threshold: f64,
) -> Result<BoundaryIndices> {
    if !threshold.is_finite() {
        return Err(PhenologyError::InvalidConfiguration(format!(
            "season_threshold must be finite, got {}",
            threshold
        )));
    }
    let vos_start = events.require(EventLabel::VosStart)?;
    let pos = events.require(EventLabel::Pos)?;
    let vos_end = events.require(EventLabel::VosEnd)?;

    let interval = series.date_range(vos_start.date, vos_end.date);
    if interval.is_empty() {
        return Err(PhenologyError::NoSeasonCandidate(
            "valley-to-valley interval is empty".to_string(),
        ));
    }
    let smoothed = &series.smoothed()[interval.clone()];
    let slope = first_difference(smoothed);

    let bos_der = argmax(&slope).map(|k| interval.start + k).ok_or_else(|| {
        PhenologyError::NoSeasonCandidate("no beginning-of-season candidate".to_string())
    })?;

    let post_peak = series.date_range(pos.date.max(vos_start.date), vos_end.date);
    let eos_der = (!post_peak.is_empty())
        .then(|| argmin(&slope[post_peak.start - interval.start..]))
        .flatten()
        .map(|k| post_peak.start + k)
        .ok_or_else(|| {
            PhenologyError::NoSeasonCandidate("no end-of-season candidate".to_string())
        })?;

    let (bos_abs, eos_abs) = nearest_pair(smoothed, threshold)
        .map(|(a, b)| (interval.start + a, interval.start + b))
        .ok_or_else(|| {
            PhenologyError::NoSeasonCandidate(
                "fewer than two points for the absolute threshold".to_string(),
            )
        })?;

    if let Some(peak) = series.index_of(pos.date) {
        if (bos_abs < peak) == (eos_abs < peak) {
            tracing::warn!(
                bos_abs = %series.dates()[bos_abs],
                eos_abs = %series.dates()[eos_abs],
                pos = %pos.date,
                threshold,
                "absolute threshold points lie on the same side of the peak"
            );
        }
    }

    Ok(BoundaryIndices {
        bos_der,
        eos_der,
        bos_abs,
        eos_abs,
    })
}

/// The two positions closest to `threshold`, returned in chronological order.
///
/// Ties on distance keep the earlier position first.
fn nearest_pair(values: &[f64], threshold: f64) -> Option<(usize, usize)> {
    let mut ranked: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i, (v - threshold).abs()))
        .filter(|(_, d)| !d.is_nan())
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    match ranked.as_slice() {
        [(a, _), (b, _), ..] => Some((*a.min(b), *a.max(b))),
        _ => None,
    }
}

/// Append `bos_der`, `eos_der`, `bos_abs` and `eos_abs` to a copy of `events`.
///
/// The primary events are left untouched.
pub fn detect_season_boundaries(
    series: &Series,
    events: &EventCollection,
    threshold: f64,
) -> Result<EventCollection> {
    let found = find_season_boundaries(series, events, threshold)?;

    let mut extended = events.clone();
    for (index, label) in [
        (found.bos_der, EventLabel::BosDer),
        (found.eos_der, EventLabel::EosDer),
        (found.bos_abs, EventLabel::BosAbs),
        (found.eos_abs, EventLabel::EosAbs),
    ] {
        extended.push(PhenologicalEvent::at(series, index, label)?)?;
    }

    tracing::debug!(
        bos_der = %series.dates()[found.bos_der],
        eos_der = %series.dates()[found.eos_der],
        bos_abs = %series.dates()[found.bos_abs],
        eos_abs = %series.dates()[found.eos_abs],
        "season boundaries"
    );

    Ok(extended)
}
