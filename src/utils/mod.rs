//! Numeric helpers shared by the pipeline stages.

pub mod linalg;
pub mod stats;

pub use linalg::solve_symmetric;
pub use stats::{argmax, argmin, count_above, quantile};
