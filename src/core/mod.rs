//! Core data structures: observation series, daily series and event records.

mod events;
mod series;

pub use events::{
    DerivedMetric, EventCollection, EventLabel, EventRow, MetricKind, MetricValue,
    PhenologicalEvent,
};
pub use series::{RawSeries, Series, TimePoint};
