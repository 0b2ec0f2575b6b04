//! Seasonal metrics derived from the detected events.
//!
//! Each metric is a signed day or index difference between two events, plus
//! one percentile-exceedance count. Argument order is significant: a
//! difference from `a` to `b` is always `b - a`, and the catalogue below
//! fixes the order per metric.

use crate::core::{
    DerivedMetric, EventCollection, EventLabel, MetricKind, MetricValue, Series,
};
use crate::error::Result;
use crate::transform::days_between_dates;
use crate::utils::{count_above, quantile};

/// Quantile used by [`percentile_exceedance`].
pub const EXCEEDANCE_QUANTILE: f64 = 0.85;

/// How a catalogue entry is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormula {
    /// `days_between(from, to)`.
    Days(EventLabel, EventLabel),
    /// `value_difference(from, to)`.
    Value(EventLabel, EventLabel),
    /// [`percentile_exceedance`].
    PercentileCount,
}

/// The formula behind each catalogue entry.
pub fn metric_formula(kind: MetricKind) -> MetricFormula {
    use EventLabel::*;
    use MetricFormula::*;

    match kind {
        MetricKind::ValleyToValleyDays => Days(VosStart, VosEnd),
        MetricKind::AbsoluteSeasonDays => Days(EosAbs, BosAbs),
        MetricKind::GreenUpAmplitude => Value(BosAbs, Pos),
        MetricKind::OnsetToPeakDays => Days(Pos, BosAbs),
        MetricKind::ValleyToOnsetDays => Days(VosStart, BosAbs),
        MetricKind::OnsetAmplitude => Value(VosStart, BosAbs),
        MetricKind::SenescenceToValleyDays => Days(EosAbs, VosEnd),
        MetricKind::SenescenceAmplitude => Value(EosAbs, Pos),
        MetricKind::PeakToSenescenceDays => Days(EosAbs, Pos),
        MetricKind::TailAmplitude => Value(VosEnd, EosAbs),
        MetricKind::HighPercentileCount => PercentileCount,
    }
}

/// Signed whole days from event `from` to event `to` (`to - from`).
pub fn days_between(events: &EventCollection, from: EventLabel, to: EventLabel) -> Result<i64> {
    let from = events.require(from)?;
    let to = events.require(to)?;
    Ok(days_between_dates(from.date, to.date))
}

/// Index difference from event `from` to event `to` (`to - from`).
pub fn value_difference(events: &EventCollection, from: EventLabel, to: EventLabel) -> Result<f64> {
    let from = events.require(from)?;
    let to = events.require(to)?;
    Ok(to.value - from.value)
}

/// Days in `[eos_abs, bos_abs]` whose smoothed index is strictly above the
/// 85th percentile of that window.
///
/// The window runs from `eos_abs` up to `bos_abs`, so it is empty (and the
/// count is zero) whenever `eos_abs` falls after `bos_abs`.
pub fn percentile_exceedance(events: &EventCollection, series: &Series) -> Result<usize> {
    let lower = events.require(EventLabel::EosAbs)?.date;
    let upper = events.require(EventLabel::BosAbs)?.date;

    let window = &series.smoothed()[series.date_range(lower, upper)];
    let cutoff = quantile(window, EXCEEDANCE_QUANTILE);
    Ok(count_above(window, cutoff))
}

/// Evaluate the full catalogue without touching `events`.
pub fn compute_metrics(events: &EventCollection, series: &Series) -> Result<Vec<DerivedMetric>> {
    MetricKind::ALL
        .iter()
        .map(|&kind| {
            let value = match metric_formula(kind) {
                MetricFormula::Days(from, to) => MetricValue::Days(days_between(events, from, to)?),
                MetricFormula::Value(from, to) => {
                    MetricValue::Index(value_difference(events, from, to)?)
                }
                MetricFormula::PercentileCount => {
                    MetricValue::Count(percentile_exceedance(events, series)?)
                }
            };
            Ok(DerivedMetric::new(kind, value))
        })
        .collect()
}

/// Append the metric catalogue to a copy of `events`.
///
/// All metrics are computed before anything is appended, so a missing event
/// leaves no partial metric rows behind.
pub fn derive_metrics(events: &EventCollection, series: &Series) -> Result<EventCollection> {
    let metrics = compute_metrics(events, series)?;
    for m in &metrics {
        tracing::debug!(metric = m.label(), value = m.value.as_f64(), "derived metric");
    }

    let mut extended = events.clone();
    extended.push_metrics(metrics)?;
    Ok(extended)
}
