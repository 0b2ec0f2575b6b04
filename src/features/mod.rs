//! Features computed from a detected season.
//!
//! - Seasonal metric catalogue (day/value differences, percentile count)
//! - Accumulation of an auxiliary daily variable over the season

pub mod accumulation;
pub mod metrics;

pub use accumulation::{accumulate_season, SeasonAccumulation, SeasonBoundaries};
pub use metrics::{
    compute_metrics, days_between, derive_metrics, metric_formula, percentile_exceedance,
    value_difference, MetricFormula, EXCEEDANCE_QUANTILE,
};
