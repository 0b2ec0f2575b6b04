//! # crop-phenology
//!
//! Crop phenology extraction from satellite vegetation-index time series.
//!
//! Given irregular observations of an index such as NDVI for one field, the
//! crate smooths and regularizes them to a daily series, locates the growing
//! season (valleys, peak, beginning and end of season) and derives a fixed
//! catalogue of seasonal metrics.
//!
//! ```no_run
//! use crop_phenology::prelude::*;
//!
//! # fn run(raw: &RawSeries) -> crop_phenology::Result<()> {
//! let config = PhenologyConfig::new(7, 2, 10, 0.5);
//! let report = extract_phenology(raw, &config)?;
//! for row in report.rows() {
//!     println!("{:?} {:?} {}", row.date, row.value, row.label);
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod regularize;
pub mod transform;
pub mod utils;

pub use error::{PhenologyError, Result};

pub mod prelude {
    pub use crate::core::{
        DerivedMetric, EventCollection, EventLabel, EventRow, MetricKind, MetricValue,
        PhenologicalEvent, RawSeries, Series,
    };
    pub use crate::error::{PhenologyError, Result};
    pub use crate::features::{accumulate_season, SeasonAccumulation, SeasonBoundaries};
    pub use crate::pipeline::{extract_phenology, PhenologyConfig, PhenologyReport};
    pub use crate::regularize::{regularize, RegularizeConfig, Regularization};
}
