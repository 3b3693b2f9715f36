//! Finds the recorded period that governs a given day.

use chrono::NaiveDate;

use crate::models::CycleEvent;

/// Read-only index over a period history, ascending by start date.
///
/// Built from a snapshot of the events and rebuilt whenever they change;
/// the events themselves are only borrowed.
#[derive(Debug, Clone)]
pub struct History<'a> {
    sorted: Vec<&'a CycleEvent>,
}

/// The period a day falls under, and the next recorded start if there is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<'a> {
    pub anchor: &'a CycleEvent,
    pub closing: Option<&'a CycleEvent>,
}

impl Anchor<'_> {
    /// A closed cycle has a known length; an open one is projected.
    pub fn is_closed(&self) -> bool {
        self.closing.is_some()
    }
}

impl<'a> History<'a> {
    pub fn new(events: &'a [CycleEvent]) -> Self {
        let mut sorted: Vec<&CycleEvent> = events.iter().collect();
        sorted.sort_by_key(|e| e.start_date);
        Self { sorted }
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CycleEvent> + '_ {
        self.sorted.iter().copied()
    }

    /// Most recent recorded start.
    pub fn latest(&self) -> Option<&'a CycleEvent> {
        self.sorted.last().copied()
    }

    /// The latest event starting on or before `day`, plus its successor.
    pub fn resolve_anchor(&self, day: NaiveDate) -> Option<Anchor<'a>> {
        let idx = self.sorted.partition_point(|e| e.start_date <= day);
        if idx == 0 {
            return None;
        }
        Some(Anchor {
            anchor: self.sorted[idx - 1],
            closing: self.sorted.get(idx).copied(),
        })
    }

    /// Consecutive start-to-start gaps in days.
    pub fn gaps(&self) -> Vec<i64> {
        self.sorted
            .windows(2)
            .map(|w| crate::dates::days_between(w[1].start_date, w[0].start_date))
            .collect()
    }

    pub(crate) fn as_slice(&self) -> &[&'a CycleEvent] {
        &self.sorted
    }
}

/// Resolve the anchor for `day` over an unsorted history.
pub fn resolve_anchor(day: NaiveDate, history: &[CycleEvent]) -> Option<Anchor<'_>> {
    History::new(history).resolve_anchor(day)
}
