//! Signal transformations used by the regularizer.
//!
//! Provides Savitzky–Golay smoothing and daily linear resampling.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use crop_phenology::transform::{resample_daily, savgol_filter};
//!
//! let smoothed = savgol_filter(&[0.2, 0.3, 0.5, 0.4, 0.6, 0.7, 0.5], 5, 2).unwrap();
//!
//! let dates = [
//!     NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2023, 4, 3).unwrap(),
//! ];
//! let (grid, values) = resample_daily(&dates, &[0.2, 0.4]).unwrap();
//! assert_eq!(grid.len(), 3);
//! assert!((values[1] - 0.3).abs() < 1e-12);
//! # assert_eq!(smoothed.len(), 7);
//! ```

pub mod resample;
pub mod savgol;

pub use resample::{
    daily_dates, days_between_dates, interpolate_daily, resample_daily,
};
pub use savgol::{fit_weights, savgol_filter};
