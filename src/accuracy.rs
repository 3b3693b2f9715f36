//! Walk-forward backtest of start-date predictions.

use crate::anchor::History;
use crate::dates::{add_days, days_between, round_half_up};
use crate::models::CycleEvent;

/// Reported when there are too few periods to replay any prediction.
pub const DEFAULT_ACCURACY: u8 = 85;
/// A prediction within this many days of the actual start counts as a hit.
pub const TOLERANCE_DAYS: i64 = 2;

/// Percentage of past period starts that would have been predicted within
/// [`TOLERANCE_DAYS`], each prediction using only the starts before it.
pub fn estimate_accuracy(history: &[CycleEvent]) -> u8 {
    let history = History::new(history);
    let events = history.as_slice();
    if events.len() < 3 {
        return DEFAULT_ACCURACY;
    }

    let gaps = history.gaps();
    let hits = (2..events.len())
        .filter(|&target| {
            // Gaps between the first `target` starts only.
            let known = &gaps[..target - 1];
            let avg_gap = known.iter().sum::<i64>() as f64 / known.len() as f64;

            let predicted = add_days(events[target - 1].start_date, round_half_up(avg_gap));
            let actual = events[target].start_date;
            days_between(actual, predicted).abs() <= TOLERANCE_DAYS
        })
        .count();

    percent(hits, events.len() - 2)
}

fn percent(part: usize, whole: usize) -> u8 {
    // Integer half-up: round(100 * part / whole).
    let scaled = (200 * part + whole) / (2 * whole);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}
