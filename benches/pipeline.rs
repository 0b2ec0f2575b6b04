//! Benchmarks for the phenology extraction stages.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crop_phenology::core::RawSeries;
use crop_phenology::detection::{detect_cycle, detect_season_boundaries};
use crop_phenology::pipeline::{extract_phenology, PhenologyConfig};
use crop_phenology::regularize::regularize;
use crop_phenology::transform::savgol_filter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One season every 365 days, observed every 5 days with small noise.
/// The first valley falls on day 50 so every season is bracketed.
fn generate_field(years: usize) -> RawSeries {
    let mut rng = StdRng::seed_from_u64(7);
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let n = years * 73 + 20;

    let dates = (0..n).map(|i| start + Duration::days(5 * i as i64)).collect();
    let values = (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * (5 * i as i64 - 50) as f64 / 365.0;
            0.45 - 0.3 * phase.cos() + rng.gen_range(-0.01..0.01)
        })
        .collect();
    RawSeries::new(dates, values).unwrap()
}

fn bench_savgol(c: &mut Criterion) {
    let mut group = c.benchmark_group("savgol_filter");

    for window in [7, 15, 31].iter() {
        let field = generate_field(4);
        group.bench_with_input(BenchmarkId::new("window", window), window, |b, &w| {
            b.iter(|| savgol_filter(black_box(field.values()), w, 2))
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let config = PhenologyConfig::new(7, 2, 30, 0.45);
    let field = generate_field(1);
    let series = regularize(&field, &config.regularize_config())
        .unwrap()
        .into_series()
        .unwrap();
    let primary = detect_cycle(&series, config.extrema_order).unwrap();

    c.bench_function("regularize", |b| {
        b.iter(|| regularize(black_box(&field), &config.regularize_config()))
    });
    c.bench_function("detect_cycle", |b| {
        b.iter(|| detect_cycle(black_box(&series), config.extrema_order))
    });
    c.bench_function("detect_season_boundaries", |b| {
        b.iter(|| detect_season_boundaries(black_box(&series), &primary, config.season_threshold))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_phenology");
    let config = PhenologyConfig::new(7, 2, 30, 0.45);

    for years in [1, 3, 5].iter() {
        let field = generate_field(*years);
        group.bench_with_input(BenchmarkId::new("years", years), years, |b, _| {
            b.iter(|| extract_phenology(black_box(&field), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_savgol, bench_stages, bench_pipeline);
criterion_main!(benches);
