//! End-to-end phenology extraction for one field.
//!
//! ```text
//! RawSeries -> regularize -> detect_cycle -> detect_season_boundaries
//!           -> derive_metrics -> PhenologyReport
//! ```
//!
//! Every stage is a pure function of its inputs, so fields can be processed
//! in parallel by giving each invocation its own `RawSeries`.

use crate::core::{
    DerivedMetric, EventCollection, EventLabel, EventRow, MetricKind, PhenologicalEvent,
    RawSeries, Series,
};
use crate::detection::{detect_cycle, detect_season_boundaries};
use crate::error::{PhenologyError, Result};
use crate::features::derive_metrics;
use crate::regularize::{regularize, RegularizeConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`extract_phenology`]. All fields are required.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhenologyConfig {
    /// Savitzky–Golay window length (odd, at least `poly_order + 2`).
    pub window_size: usize,
    /// Savitzky–Golay polynomial order.
    pub poly_order: usize,
    /// Neighbours on each side a local extremum must strictly beat.
    pub extrema_order: usize,
    /// Index value for the absolute beginning/end-of-season policy.
    pub season_threshold: f64,
}

impl PhenologyConfig {
    pub fn new(
        window_size: usize,
        poly_order: usize,
        extrema_order: usize,
        season_threshold: f64,
    ) -> Self {
        Self {
            window_size,
            poly_order,
            extrema_order,
            season_threshold,
        }
    }

    /// Set the smoothing window and polynomial order.
    pub fn with_smoothing(mut self, window_size: usize, poly_order: usize) -> Self {
        self.window_size = window_size;
        self.poly_order = poly_order;
        self
    }

    /// Set the extrema order.
    pub fn with_extrema_order(mut self, order: usize) -> Self {
        self.extrema_order = order;
        self
    }

    /// Set the absolute season threshold.
    pub fn with_season_threshold(mut self, threshold: f64) -> Self {
        self.season_threshold = threshold;
        self
    }

    pub fn regularize_config(&self) -> RegularizeConfig {
        RegularizeConfig::new(self.window_size, self.poly_order)
    }

    /// Validate against a series of `n_observations` raw observations.
    pub fn validate(&self, n_observations: usize) -> Result<()> {
        self.regularize_config().validate(n_observations)?;
        self.validate_detection()
    }

    fn validate_detection(&self) -> Result<()> {
        if self.extrema_order == 0 {
            return Err(PhenologyError::InvalidConfiguration(
                "extrema_order must be positive".to_string(),
            ));
        }
        if !self.season_threshold.is_finite() {
            return Err(PhenologyError::InvalidConfiguration(format!(
                "season_threshold must be finite, got {}",
                self.season_threshold
            )));
        }
        Ok(())
    }
}

/// Regularized series and the complete event table for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct PhenologyReport {
    pub series: Series,
    pub events: EventCollection,
}

impl PhenologyReport {
    pub fn event(&self, label: EventLabel) -> Option<&PhenologicalEvent> {
        self.events.get(label)
    }

    pub fn metric(&self, kind: MetricKind) -> Option<&DerivedMetric> {
        self.events.metric(kind)
    }

    /// The uniform `{date, value, label}` table.
    pub fn rows(&self) -> Vec<EventRow> {
        self.events.rows()
    }
}

/// Run the full pipeline on one raw series.
///
/// Fewer than [`MIN_OBSERVATIONS`](crate::regularize::MIN_OBSERVATIONS)
/// observations yield [`PhenologyError::InsufficientData`]; callers
/// typically skip the field in that case.
pub fn extract_phenology(raw: &RawSeries, config: &PhenologyConfig) -> Result<PhenologyReport> {
    config.validate_detection()?;

    let series = regularize(raw, &config.regularize_config())?.into_series()?;
    let primary = detect_cycle(&series, config.extrema_order)?;
    let bounded = detect_season_boundaries(&series, &primary, config.season_threshold)?;

    for label in ordering_violations(&bounded) {
        if let Some(event) = bounded.get(label) {
            tracing::warn!(
                event = %label,
                date = %event.date,
                "event outside its expected season window"
            );
        }
    }

    let events = derive_metrics(&bounded, &series)?;
    tracing::info!(
        days = series.len(),
        rows = events.len(),
        "phenology extracted"
    );

    Ok(PhenologyReport { series, events })
}

/// Boundary events that fall outside their expected window.
///
/// `bos_*` must lie in `[vos_start, pos]` and `eos_*` in `[pos, vos_end]`.
/// Labels absent from the collection are not reported.
pub fn ordering_violations(events: &EventCollection) -> Vec<EventLabel> {
    let (Some(vos_start), Some(pos), Some(vos_end)) = (
        events.get(EventLabel::VosStart),
        events.get(EventLabel::Pos),
        events.get(EventLabel::VosEnd),
    ) else {
        return Vec::new();
    };

    let windows = [
        (EventLabel::BosDer, vos_start.date, pos.date),
        (EventLabel::EosDer, pos.date, vos_end.date),
        (EventLabel::BosAbs, vos_start.date, pos.date),
        (EventLabel::EosAbs, pos.date, vos_end.date),
    ];

    windows
        .iter()
        .filter(|(label, lo, hi)| {
            events
                .get(*label)
                .is_some_and(|e| e.date < *lo || e.date > *hi)
        })
        .map(|(label, _, _)| *label)
        .collect()
}
