//! Savitzky–Golay polynomial smoothing.
//!
//! Interior points use the centred convolution weights. The first and last
//! `window / 2` points are taken from a polynomial fitted to the first/last
//! full window and evaluated at their positions, so the output has the same
//! length as the input and no padding values leak into the edges.

use crate::error::{PhenologyError, Result};
use crate::utils::solve_symmetric;

/// Smooth `values` with a Savitzky–Golay filter.
///
/// # Arguments
/// * `values` - Input samples (assumed equally weighted, one per observation)
/// * `window` - Odd window length, at most `values.len()`
/// * `poly_order` - Polynomial order, strictly less than `window`
///
/// # Example
/// ```
/// use crop_phenology::transform::savgol_filter;
///
/// // Quadratics pass through a second-order filter unchanged.
/// let x: Vec<f64> = (0..11).map(|i| (i * i) as f64).collect();
/// let y = savgol_filter(&x, 5, 2).unwrap();
/// assert!(x.iter().zip(&y).all(|(a, b)| (a - b).abs() < 1e-9));
/// ```
pub fn savgol_filter(values: &[f64], window: usize, poly_order: usize) -> Result<Vec<f64>> {
    validate_window(values.len(), window, poly_order)?;

    let n = values.len();
    let half = window / 2;
    let mut smoothed = vec![0.0; n];

    let centre = fit_weights(window, poly_order, half)?;
    for i in half..(n - half) {
        smoothed[i] = dot(&centre, &values[i - half..i + half + 1]);
    }

    let head = &values[..window];
    let tail = &values[n - window..];
    for k in 0..half {
        smoothed[k] = dot(&fit_weights(window, poly_order, k)?, head);
    }
    for k in (half + 1)..window {
        smoothed[n - window + k] = dot(&fit_weights(window, poly_order, k)?, tail);
    }

    Ok(smoothed)
}

/// Least-squares weights that evaluate the fitted polynomial at window
/// position `at` (0-based, `window / 2` is the centre).
pub fn fit_weights(window: usize, poly_order: usize, at: usize) -> Result<Vec<f64>> {
    let half = (window / 2) as f64;
    let scale = half.max(1.0);
    let positions: Vec<f64> = (0..window).map(|i| (i as f64 - half) / scale).collect();
    let terms = poly_order + 1;

    // Gram matrix entries only depend on j + k, so accumulate power sums once.
    let mut power_sums = vec![0.0; 2 * terms - 1];
    for &u in &positions {
        let mut p = 1.0;
        for sum in power_sums.iter_mut() {
            *sum += p;
            p *= u;
        }
    }
    let gram: Vec<Vec<f64>> = (0..terms)
        .map(|j| (0..terms).map(|k| power_sums[j + k]).collect())
        .collect();

    let target = (at as f64 - half) / scale;
    let rhs: Vec<f64> = (0..terms).map(|j| target.powi(j as i32)).collect();

    let z = solve_symmetric(&gram, &rhs).ok_or_else(|| {
        PhenologyError::ComputationError(format!(
            "singular Savitzky-Golay system (window {}, order {})",
            window, poly_order
        ))
    })?;

    Ok(positions
        .iter()
        .map(|&u| {
            let mut p = 1.0;
            let mut w = 0.0;
            for &zj in &z {
                w += zj * p;
                p *= u;
            }
            w
        })
        .collect())
}

fn validate_window(n: usize, window: usize, poly_order: usize) -> Result<()> {
    if window == 0 || window % 2 == 0 {
        return Err(PhenologyError::InvalidConfiguration(format!(
            "window_size must be a positive odd number, got {}",
            window
        )));
    }
    if poly_order >= window {
        return Err(PhenologyError::InvalidConfiguration(format!(
            "poly_order ({}) must be less than window_size ({})",
            poly_order, window
        )));
    }
    if window > n {
        return Err(PhenologyError::InvalidConfiguration(format!(
            "window_size ({}) exceeds the number of observations ({})",
            window, n
        )));
    }
    Ok(())
}

fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}
