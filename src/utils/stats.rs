//! Statistical utility functions.

use std::cmp::Ordering;

/// Returns the value at the given quantile.
///
/// Linear interpolation between closest ranks (the NumPy/pandas default).
/// Non-finite inputs are ignored; an empty input yields NaN.
///
/// # Arguments
/// * `values` - Input sample
/// * `q` - Quantile (0.0 to 1.0)
///
/// # Example
/// ```
/// use crop_phenology::utils::quantile;
///
/// let q = quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.85);
/// assert!((q - 4.4).abs() < 1e-12);
/// ```
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Returns the count of values strictly greater than the threshold.
///
/// A NaN threshold counts nothing.
pub fn count_above(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&x| x > threshold).count()
}

/// Index of the first maximum, skipping NaN.
pub fn argmax(values: &[f64]) -> Option<usize> {
    first_extreme(values, |candidate, best| candidate > best)
}

/// Index of the first minimum, skipping NaN.
pub fn argmin(values: &[f64]) -> Option<usize> {
    first_extreme(values, |candidate, best| candidate < best)
}

fn first_extreme<F>(values: &[f64], better: F) -> Option<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
