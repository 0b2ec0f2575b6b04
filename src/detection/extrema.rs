//! Local extrema search and dominant-cycle selection.
//!
//! A sample is a local maximum of order `k` when it is strictly greater than
//! each of its `k` neighbours on both sides. Neighbour positions past either
//! end are clamped to the boundary sample, so the first and last samples
//! (compared against themselves) never qualify.

use crate::core::{EventCollection, EventLabel, PhenologicalEvent, Series};
use crate::error::{PhenologyError, Result};
use crate::utils::argmax;

/// Indices of strict local maxima of the given order.
pub fn local_maxima(values: &[f64], order: usize) -> Vec<usize> {
    relative_extrema(values, order, |centre, neighbour| centre > neighbour)
}

/// Indices of strict local minima of the given order.
pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    relative_extrema(values, order, |centre, neighbour| centre < neighbour)
}

fn relative_extrema<F>(values: &[f64], order: usize, beats: F) -> Vec<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let n = values.len();
    if n == 0 || order == 0 {
        return Vec::new();
    }

    (0..n)
        .filter(|&i| {
            (1..=order).all(|shift| {
                let left = i.saturating_sub(shift);
                let right = (i + shift).min(n - 1);
                beats(values[i], values[left]) && beats(values[i], values[right])
            })
        })
        .collect()
}

/// Indices of the dominant valley -> peak -> valley bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleIndices {
    pub vos_start: usize,
    pub pos: usize,
    pub vos_end: usize,
}

/// Locate the dominant cycle in a smoothed index.
///
/// The peak is the highest local maximum (first one on ties); the valleys
/// are the nearest local minima on either side of it.
pub fn find_cycle(smoothed: &[f64], order: usize) -> Result<CycleIndices> {
    if order == 0 {
        return Err(PhenologyError::InvalidConfiguration(
            "extrema_order must be positive".to_string(),
        ));
    }

    let peaks = local_maxima(smoothed, order);
    let peak_values: Vec<f64> = peaks.iter().map(|&i| smoothed[i]).collect();
    let pos = argmax(&peak_values)
        .map(|k| peaks[k])
        .ok_or_else(|| PhenologyError::NoCycleDetected("no local maxima found".to_string()))?;

    let valleys = local_minima(smoothed, order);
    let vos_start = valleys
        .iter()
        .copied()
        .filter(|&v| v < pos)
        .max()
        .ok_or_else(|| {
            PhenologyError::NoCycleDetected("no valley before the dominant peak".to_string())
        })?;
    let vos_end = valleys
        .iter()
        .copied()
        .find(|&v| v > pos)
        .ok_or_else(|| {
            PhenologyError::NoCycleDetected("no valley after the dominant peak".to_string())
        })?;

    Ok(CycleIndices {
        vos_start,
        pos,
        vos_end,
    })
}

/// Detect `vos_start`, `pos` and `vos_end` on a regularized series.
///
/// Returns a new collection holding exactly those three events.
pub fn detect_cycle(series: &Series, order: usize) -> Result<EventCollection> {
    let cycle = find_cycle(series.smoothed(), order)?;

    let mut events = EventCollection::new();
    events.push(PhenologicalEvent::at(series, cycle.vos_start, EventLabel::VosStart)?)?;
    events.push(PhenologicalEvent::at(series, cycle.pos, EventLabel::Pos)?)?;
    events.push(PhenologicalEvent::at(series, cycle.vos_end, EventLabel::VosEnd)?)?;

    tracing::debug!(
        vos_start = %series.dates()[cycle.vos_start],
        pos = %series.dates()[cycle.pos],
        vos_end = %series.dates()[cycle.vos_end],
        "dominant cycle"
    );

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series_from(values: Vec<f64>) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Series::new(dates, values.clone(), values).unwrap()
    }

    #[test]
    fn endpoints_never_qualify() {
        let values = [5.0, 1.0, 2.0, 1.0, 5.0];
        assert_eq!(local_maxima(&values, 1), vec![2]);
        assert_eq!(local_minima(&values, 1), vec![1, 3]);
        assert!(local_maxima(&[3.0, 1.0], 1).is_empty());
    }

    #[test]
    fn near_edge_neighbours_are_clamped() {
        // Index 1 only needs to beat index 0 on the left for order 3.
        let values = [0.0, 1.0, 0.5, 0.2, 0.1, 0.0];
        assert_eq!(local_maxima(&values, 3), vec![1]);
    }

    #[test]
    fn order_widens_the_neighbourhood() {
        let values = [0.0, 2.0, 1.0, 3.0, 1.0, 0.5, 0.0];
        assert_eq!(local_maxima(&values, 1), vec![1, 3]);
        assert_eq!(local_maxima(&values, 2), vec![3]);
    }

    #[test]
    fn plateaus_are_not_strict_extrema() {
        let values = [0.0, 1.0, 1.0, 0.0];
        assert!(local_maxima(&values, 1).is_empty());
        assert!(local_maxima(&[], 1).is_empty());
        assert!(local_maxima(&values, 0).is_empty());
    }

    #[test]
    fn dominant_peak_is_bracketed_by_nearest_valleys() {
        // Minor peak at 2, dominant peak at 6.
        let values = vec![0.5, 0.2, 0.6, 0.3, 0.25, 0.4, 0.9, 0.35, 0.1, 0.5];
        let cycle = find_cycle(&values, 1).unwrap();
        assert_eq!(
            cycle,
            CycleIndices {
                vos_start: 4,
                pos: 6,
                vos_end: 8
            }
        );
    }

    #[test]
    fn ties_pick_the_first_peak() {
        let values = vec![0.5, 0.1, 0.8, 0.1, 0.8, 0.1, 0.5];
        let cycle = find_cycle(&values, 1).unwrap();
        assert_eq!(cycle.pos, 2);
        assert_eq!((cycle.vos_start, cycle.vos_end), (1, 3));
    }

    #[test]
    fn missing_bracket_is_no_cycle() {
        // Monotone: no peak at all.
        let err = find_cycle(&[0.1, 0.2, 0.3, 0.4], 1).unwrap_err();
        assert!(matches!(err, PhenologyError::NoCycleDetected(_)));

        // Peak with a valley only on its right.
        let err = find_cycle(&[0.1, 0.5, 0.2, 0.4], 1).unwrap_err();
        assert_eq!(
            err,
            PhenologyError::NoCycleDetected("no valley before the dominant peak".to_string())
        );

        // Peak with a valley only on its left.
        let err = find_cycle(&[0.4, 0.2, 0.5, 0.1], 1).unwrap_err();
        assert_eq!(
            err,
            PhenologyError::NoCycleDetected("no valley after the dominant peak".to_string())
        );
    }

    #[test]
    fn zero_order_is_a_configuration_error() {
        assert!(matches!(
            find_cycle(&[0.0, 1.0, 0.0], 0),
            Err(PhenologyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn detect_cycle_emits_three_ordered_events() {
        let series = series_from(vec![0.3, 0.1, 0.4, 0.8, 0.5, 0.2, 0.6]);
        let events = detect_cycle(&series, 1).unwrap();

        let labels: Vec<_> = events.events().iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![EventLabel::VosStart, EventLabel::Pos, EventLabel::VosEnd]
        );
        let pos = events.require(EventLabel::Pos).unwrap();
        assert_eq!(pos.date, NaiveDate::from_ymd_opt(2023, 1, 4).unwrap());
        assert_eq!(pos.value, 0.8);
        assert!(events.require(EventLabel::VosStart).unwrap().date < pos.date);
        assert!(events.require(EventLabel::VosEnd).unwrap().date > pos.date);
    }
}
