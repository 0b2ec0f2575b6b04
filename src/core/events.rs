//! Phenological events, derived metrics and the event collection.

use crate::core::Series;
use crate::error::{PhenologyError, Result};
use chrono::NaiveDate;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed set of phenological markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventLabel {
    /// Valley bracketing the dominant cycle on the left.
    VosStart,
    /// Peak of season.
    Pos,
    /// Valley bracketing the dominant cycle on the right.
    VosEnd,
    /// Beginning of season from the steepest rise.
    BosDer,
    /// End of season from the steepest post-peak fall.
    EosDer,
    /// Beginning of season from the absolute threshold.
    BosAbs,
    /// End of season from the absolute threshold.
    EosAbs,
}

impl EventLabel {
    pub const ALL: [EventLabel; 7] = [
        EventLabel::VosStart,
        EventLabel::Pos,
        EventLabel::VosEnd,
        EventLabel::BosDer,
        EventLabel::EosDer,
        EventLabel::BosAbs,
        EventLabel::EosAbs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventLabel::VosStart => "vos_start",
            EventLabel::Pos => "pos",
            EventLabel::VosEnd => "vos_end",
            EventLabel::BosDer => "bos_der",
            EventLabel::EosDer => "eos_der",
            EventLabel::BosAbs => "bos_abs",
            EventLabel::EosAbs => "eos_abs",
        }
    }
}

impl fmt::Display for EventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated marker on the smoothed index curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhenologicalEvent {
    pub date: NaiveDate,
    /// Smoothed index value at `date`.
    pub value: f64,
    pub label: EventLabel,
}

impl PhenologicalEvent {
    pub fn new(date: NaiveDate, value: f64, label: EventLabel) -> Self {
        Self { date, value, label }
    }

    /// Event at a position of the daily series, valued on the smoothed index.
    pub(crate) fn at(series: &Series, index: usize, label: EventLabel) -> Result<Self> {
        let point = series
            .point(index)
            .ok_or_else(|| PhenologyError::ComputationError(format!(
                "{} index {} outside series of length {}",
                label,
                index,
                series.len()
            )))?;
        Ok(Self::new(point.date, point.smoothed_index, label))
    }
}

/// The fixed catalogue of seasonal metrics, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricKind {
    ValleyToValleyDays,
    AbsoluteSeasonDays,
    GreenUpAmplitude,
    OnsetToPeakDays,
    ValleyToOnsetDays,
    OnsetAmplitude,
    SenescenceToValleyDays,
    SenescenceAmplitude,
    PeakToSenescenceDays,
    TailAmplitude,
    HighPercentileCount,
}

impl MetricKind {
    pub const ALL: [MetricKind; 11] = [
        MetricKind::ValleyToValleyDays,
        MetricKind::AbsoluteSeasonDays,
        MetricKind::GreenUpAmplitude,
        MetricKind::OnsetToPeakDays,
        MetricKind::ValleyToOnsetDays,
        MetricKind::OnsetAmplitude,
        MetricKind::SenescenceToValleyDays,
        MetricKind::SenescenceAmplitude,
        MetricKind::PeakToSenescenceDays,
        MetricKind::TailAmplitude,
        MetricKind::HighPercentileCount,
    ];

    /// Row label used in the event table.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::ValleyToValleyDays => "Days between vos_end and vos_start",
            MetricKind::AbsoluteSeasonDays => "Days between bos_abs and eos_abs",
            MetricKind::GreenUpAmplitude => "NDVI difference between bos_abs and pos",
            MetricKind::OnsetToPeakDays => "Days difference between bos_abs and pos",
            MetricKind::ValleyToOnsetDays => "Days difference between vos_start and bos_abs",
            MetricKind::OnsetAmplitude => "NDVI difference between vos_start and bos_abs",
            MetricKind::SenescenceToValleyDays => "Days difference between vos_end and eos_abs",
            MetricKind::SenescenceAmplitude => "NDVI difference between eos_abs and pos",
            MetricKind::PeakToSenescenceDays => "Days difference between eos_abs and pos",
            MetricKind::TailAmplitude => "NDVI difference between eos_abs and vos_end",
            MetricKind::HighPercentileCount => {
                "Count 85% percentiles days between bos_abs and eos_abs"
            }
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value in the event table.
///
/// Serialized externally tagged (`{"days": 61}`, `{"count": 4}`) so day
/// differences and counts stay distinct after a round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricValue {
    /// Signed whole-day difference.
    Days(i64),
    /// Vegetation-index value or difference.
    Index(f64),
    Count(usize),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Days(d) => d as f64,
            MetricValue::Index(v) => v,
            MetricValue::Count(c) => c as f64,
        }
    }
}

/// One scalar metric derived from the event set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedMetric {
    pub kind: MetricKind,
    pub value: MetricValue,
}

impl DerivedMetric {
    pub fn new(kind: MetricKind, value: MetricValue) -> Self {
        Self { kind, value }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Row of the uniform `{date, value, label}` table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRow {
    /// `None` for derived metrics.
    pub date: Option<NaiveDate>,
    pub value: MetricValue,
    pub label: String,
}

/// Ordered, append-only collection of events followed by derived metrics.
///
/// Each label appears at most once and the metric catalogue is appended at
/// most once. Stages never reorder or remove rows.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventCollection {
    events: Vec<PhenologicalEvent>,
    metrics: Vec<DerivedMetric>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, rejecting a second event with the same label.
    pub fn push(&mut self, event: PhenologicalEvent) -> Result<()> {
        if self.get(event.label).is_some() {
            return Err(PhenologyError::AssertionViolation(format!(
                "event {} reported twice",
                event.label
            )));
        }
        self.events.push(event);
        Ok(())
    }

    /// Append the full metric catalogue.
    pub fn push_metrics(&mut self, metrics: Vec<DerivedMetric>) -> Result<()> {
        if !self.metrics.is_empty() {
            return Err(PhenologyError::AssertionViolation(
                "derived metrics appended twice".to_string(),
            ));
        }
        self.metrics = metrics;
        Ok(())
    }

    pub fn get(&self, label: EventLabel) -> Option<&PhenologicalEvent> {
        self.events.iter().find(|e| e.label == label)
    }

    /// Like [`get`](Self::get) but a missing label is an error.
    pub fn require(&self, label: EventLabel) -> Result<&PhenologicalEvent> {
        self.get(label).ok_or(PhenologyError::MissingEvent(label))
    }

    pub fn events(&self) -> &[PhenologicalEvent] {
        &self.events
    }

    pub fn metrics(&self) -> &[DerivedMetric] {
        &self.metrics
    }

    pub fn metric(&self, kind: MetricKind) -> Option<&DerivedMetric> {
        self.metrics.iter().find(|m| m.kind == kind)
    }

    /// Total number of rows (events plus metrics).
    pub fn len(&self) -> usize {
        self.events.len() + self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.metrics.is_empty()
    }

    /// Render the collection as the uniform event table, in insertion order.
    pub fn rows(&self) -> Vec<EventRow> {
        let events = self.events.iter().map(|e| EventRow {
            date: Some(e.date),
            value: MetricValue::Index(e.value),
            label: e.label.as_str().to_string(),
        });
        let metrics = self.metrics.iter().map(|m| EventRow {
            date: None,
            value: m.value,
            label: m.label().to_string(),
        });
        events.chain(metrics).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels_render_snake_case() {
        let names: Vec<_> = EventLabel::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            names,
            vec!["vos_start", "pos", "vos_end", "bos_der", "eos_der", "bos_abs", "eos_abs"]
        );
    }

    #[test]
    fn collection_rejects_duplicate_labels() {
        let mut events = EventCollection::new();
        events
            .push(PhenologicalEvent::new(day(2023, 5, 1), 0.8, EventLabel::Pos))
            .unwrap();
        let err = events
            .push(PhenologicalEvent::new(day(2023, 6, 1), 0.9, EventLabel::Pos))
            .unwrap_err();
        assert!(matches!(err, PhenologyError::AssertionViolation(_)));
        assert_eq!(events.events().len(), 1);
    }

    #[test]
    fn require_reports_missing_label() {
        let events = EventCollection::new();
        assert_eq!(
            events.require(EventLabel::EosAbs).unwrap_err(),
            PhenologyError::MissingEvent(EventLabel::EosAbs)
        );
    }

    #[test]
    fn rows_keep_insertion_order_and_blank_metric_dates() {
        let mut events = EventCollection::new();
        events
            .push(PhenologicalEvent::new(day(2023, 3, 1), 0.2, EventLabel::VosStart))
            .unwrap();
        events
            .push(PhenologicalEvent::new(day(2023, 5, 1), 0.8, EventLabel::Pos))
            .unwrap();
        events
            .push_metrics(vec![DerivedMetric::new(
                MetricKind::ValleyToValleyDays,
                MetricValue::Days(61),
            )])
            .unwrap();

        let rows = events.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "vos_start");
        assert_eq!(rows[1].date, Some(day(2023, 5, 1)));
        assert_eq!(rows[2].date, None);
        assert_eq!(rows[2].label, "Days between vos_end and vos_start");
        assert_eq!(rows[2].value, MetricValue::Days(61));

        assert!(events.push_metrics(vec![]).is_err());
    }

    #[test]
    fn metric_values_convert_to_f64() {
        assert_eq!(MetricValue::Days(-12).as_f64(), -12.0);
        assert_eq!(MetricValue::Count(4).as_f64(), 4.0);
        assert_eq!(MetricValue::Index(0.25).as_f64(), 0.25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn metric_values_keep_their_kind_through_json() {
        for value in [
            MetricValue::Days(4),
            MetricValue::Count(4),
            MetricValue::Index(0.5),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: MetricValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
        assert_eq!(
            serde_json::to_string(&MetricValue::Count(4)).unwrap(),
            r#"{"count":4}"#
        );
    }
}
