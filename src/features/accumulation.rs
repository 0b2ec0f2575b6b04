//! Accumulation of an auxiliary daily variable over the detected season.
//!
//! Typical use is summing precipitation (or growing degree days) between
//! the beginning and end of season. The auxiliary series is independent of
//! the vegetation index and is never modified.

use crate::core::{EventCollection, EventLabel, PhenologicalEvent, RawSeries};
use crate::error::{PhenologyError, Result};
use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which pair of markers delimits the accumulation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeasonBoundaries {
    /// `vos_start` to `vos_end`.
    Valley,
    /// `bos_der` to `eos_der`.
    Derivative,
    /// `bos_abs` to `eos_abs`.
    Absolute,
}

impl SeasonBoundaries {
    /// Start and end labels of the window.
    pub fn labels(&self) -> (EventLabel, EventLabel) {
        match self {
            SeasonBoundaries::Valley => (EventLabel::VosStart, EventLabel::VosEnd),
            SeasonBoundaries::Derivative => (EventLabel::BosDer, EventLabel::EosDer),
            SeasonBoundaries::Absolute => (EventLabel::BosAbs, EventLabel::EosAbs),
        }
    }
}

/// Auxiliary series annotated with its running in-season total.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAccumulation {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    /// Running sum inside a season window, `None` outside.
    pub cumulative: Vec<Option<f64>>,
    /// Closed windows the sums were taken over.
    pub windows: Vec<(NaiveDate, NaiveDate)>,
}

impl SeasonAccumulation {
    /// Total accumulated over the last window, if any day fell inside one.
    pub fn total(&self) -> Option<f64> {
        self.cumulative.iter().rev().find_map(|c| *c)
    }

    /// Number of auxiliary rows inside a window.
    pub fn days_in_season(&self) -> usize {
        self.cumulative.iter().filter(|c| c.is_some()).count()
    }
}

/// Accumulate `auxiliary` between the start and end markers in `events`.
///
/// Start and end markers are paired in order; unequal counts or a start
/// after its end mean the detection stage is broken and are reported as
/// [`PhenologyError::AssertionViolation`]. Non-finite auxiliary values add
/// nothing to the running sum.
pub fn accumulate_season(
    events: &EventCollection,
    auxiliary: &RawSeries,
    boundaries: SeasonBoundaries,
) -> Result<SeasonAccumulation> {
    let (start_label, end_label) = boundaries.labels();
    let starts = markers(events, start_label);
    let ends = markers(events, end_label);

    if starts.len() != ends.len() {
        return Err(PhenologyError::AssertionViolation(format!(
            "{} {} markers but {} {} markers",
            starts.len(),
            start_label,
            ends.len(),
            end_label
        )));
    }

    let windows = starts
        .iter()
        .zip(&ends)
        .map(|(s, e)| {
            if s.date > e.date {
                Err(PhenologyError::AssertionViolation(format!(
                    "{} ({}) falls after {} ({})",
                    start_label, s.date, end_label, e.date
                )))
            } else {
                Ok((s.date, e.date))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let mut cumulative = Vec::with_capacity(auxiliary.len());
    let mut running: Option<(usize, f64)> = None;
    for (&date, &value) in auxiliary.dates().iter().zip(auxiliary.values()) {
        let window = windows
            .iter()
            .position(|(start, end)| *start <= date && date <= *end);
        match window {
            Some(w) => {
                let base = match running {
                    Some((current, sum)) if current == w => sum,
                    _ => 0.0,
                };
                let sum = if value.is_finite() { base + value } else { base };
                running = Some((w, sum));
                cumulative.push(Some(sum));
            }
            None => cumulative.push(None),
        }
    }

    Ok(SeasonAccumulation {
        dates: auxiliary.dates().to_vec(),
        values: auxiliary.values().to_vec(),
        cumulative,
        windows,
    })
}

fn markers(events: &EventCollection, label: EventLabel) -> Vec<&PhenologicalEvent> {
    events.events().iter().filter(|e| e.label == label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn rainfall(n: usize) -> RawSeries {
        let dates = (0..n).map(|i| day(1) + Duration::days(i as i64)).collect();
        let values = (0..n).map(|i| (i % 3) as f64).collect();
        RawSeries::new(dates, values).unwrap()
    }

    fn events(pairs: &[(EventLabel, u32)]) -> EventCollection {
        let mut events = EventCollection::new();
        for &(label, d) in pairs {
            events
                .push(PhenologicalEvent::new(day(d), 0.5, label))
                .unwrap();
        }
        events
    }

    #[test]
    fn sums_inside_the_closed_window_only() {
        let events = events(&[(EventLabel::BosAbs, 4), (EventLabel::EosAbs, 8)]);
        let acc = accumulate_season(&events, &rainfall(12), SeasonBoundaries::Absolute).unwrap();

        // Jan 4..=Jan 8 carry rainfall 0, 1, 2, 0, 1.
        assert_eq!(acc.cumulative[2], None);
        assert_eq!(acc.cumulative[3], Some(0.0));
        assert_eq!(acc.cumulative[5], Some(3.0));
        assert_eq!(acc.cumulative[8], None);
        assert_relative_eq!(acc.total().unwrap(), 4.0, epsilon = 1e-12);
        assert_eq!(acc.days_in_season(), 5);
        assert_eq!(acc.windows, vec![(day(4), day(8))]);
    }

    #[test]
    fn missing_values_do_not_break_the_running_sum() {
        let dates = (0..5).map(|i| day(1) + Duration::days(i)).collect();
        let aux = RawSeries::new(dates, vec![1.0, f64::NAN, 2.0, 3.0, 1.0]).unwrap();
        let events = events(&[(EventLabel::VosStart, 1), (EventLabel::VosEnd, 4)]);
        let acc = accumulate_season(&events, &aux, SeasonBoundaries::Valley).unwrap();

        assert_eq!(acc.cumulative, vec![Some(1.0), Some(1.0), Some(3.0), Some(6.0), None]);
    }

    #[test]
    fn unpaired_markers_are_an_assertion_violation() {
        let events = events(&[(EventLabel::BosDer, 4)]);
        let err = accumulate_season(&events, &rainfall(10), SeasonBoundaries::Derivative)
            .unwrap_err();
        assert_eq!(
            err,
            PhenologyError::AssertionViolation("1 bos_der markers but 0 eos_der markers".to_string())
        );
    }

    #[test]
    fn start_after_end_is_an_assertion_violation() {
        let events = events(&[(EventLabel::BosAbs, 8), (EventLabel::EosAbs, 4)]);
        assert!(matches!(
            accumulate_season(&events, &rainfall(10), SeasonBoundaries::Absolute),
            Err(PhenologyError::AssertionViolation(_))
        ));
    }

    #[test]
    fn no_markers_leaves_everything_outside() {
        let acc =
            accumulate_season(&EventCollection::new(), &rainfall(5), SeasonBoundaries::Valley)
                .unwrap();
        assert!(acc.cumulative.iter().all(Option::is_none));
        assert_eq!(acc.total(), None);
        assert_eq!(acc.values.len(), 5);
    }
}
