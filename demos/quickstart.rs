//! Extract the phenology of a single synthetic field and print the event table.
//!
//! Run with `cargo run --example quickstart`.

use chrono::{Duration, NaiveDate};
use crop_phenology::prelude::*;

fn main() -> Result<()> {
    // Roughly weekly acquisitions with a few cloudy (fill value) scenes.
    let start = NaiveDate::from_ymd_opt(2023, 9, 1).expect("valid calendar date");
    let mut dates = Vec::new();
    let mut ndvi = Vec::new();
    let mut rainfall_dates = Vec::new();
    for i in 0..40i64 {
        let day = 6 * i + i % 3;
        let t = (day - 120) as f64;
        dates.push(start + Duration::days(day));
        ndvi.push(if i % 11 == 5 {
            -9999.0
        } else {
            0.18 + 0.62 * (-(t / 35.0).powi(2)).exp() + 0.000012 * t * t
        });
    }
    for day in 0..240i64 {
        rainfall_dates.push(start + Duration::days(day));
    }
    let rainfall: Vec<f64> = (0..240).map(|d| if d % 9 == 0 { 12.5 } else { 0.4 }).collect();

    let raw = RawSeries::from_unsorted(dates, ndvi, Some(-9999.0))?;
    let config = PhenologyConfig::new(7, 2, 15, 0.5);
    let report = extract_phenology(&raw, &config)?;

    println!("{:<12} {:>10}  label", "date", "value");
    for row in report.rows() {
        let date = row.date.map(|d| d.to_string()).unwrap_or_default();
        println!("{:<12} {:>10.3}  {}", date, row.value.as_f64(), row.label);
    }

    let rainfall = RawSeries::new(rainfall_dates, rainfall)?;
    let season = accumulate_season(&report.events, &rainfall, SeasonBoundaries::Absolute)?;
    println!(
        "\nrainfall between bos_abs and eos_abs: {:.1} mm over {} days",
        season.total().unwrap_or(0.0),
        season.days_in_season()
    );

    Ok(())
}
