//! Event detection on the regularized series.
//!
//! This module provides:
//! - Local extrema search and dominant valley/peak/valley selection
//! - Beginning/end-of-season boundaries by derivative and absolute threshold

mod boundary;
mod extrema;

pub use boundary::{
    detect_season_boundaries, find_season_boundaries, first_difference, BoundaryIndices,
};
pub use extrema::{detect_cycle, find_cycle, local_maxima, local_minima, CycleIndices};
