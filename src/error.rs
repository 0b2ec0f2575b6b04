//! Error types for the crop-phenology library.

use crate::core::EventLabel;
use thiserror::Error;

/// Result type alias for phenology operations.
pub type Result<T> = std::result::Result<T, PhenologyError>;

/// Errors that can occur while extracting phenological events.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhenologyError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Too few observations for the smoothing/resampling pipeline.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Smoothing window, polynomial order or extrema order is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Dimension mismatch between columns.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// No valley -> peak -> valley bracket could be found.
    #[error("no phenological cycle detected: {0}")]
    NoCycleDetected(String),

    /// A season boundary search ran over an empty candidate set.
    #[error("no season boundary candidate: {0}")]
    NoSeasonCandidate(String),

    /// A required event is absent from the collection.
    #[error("missing phenological event: {0}")]
    MissingEvent(EventLabel),

    /// A structural pairing that detection must guarantee does not hold.
    #[error("assertion violated: {0}")]
    AssertionViolation(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}
