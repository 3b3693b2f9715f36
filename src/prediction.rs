use chrono::NaiveDate;

use crate::anchor::History;
use crate::dates::{add_days, checked_add_days, days_between, month_bounds};
use crate::models::{
    CycleEvent, CyclePhase, CycleSettings, CycleWindow, DayClassification, PhaseInfo,
    TodaySummary,
};

/// Ovulation is taken to fall this many days before the next period.
const LUTEAL_LENGTH_DAYS: i64 = 14;
/// Fertile days before ovulation.
const FERTILE_LEAD_DAYS: i64 = 5;
/// Fertile days after ovulation.
const FERTILE_TAIL_DAYS: i64 = 1;

/// Estimated ovulation day for a cycle ending the day before `next_period_start`.
pub fn ovulation_for(next_period_start: NaiveDate) -> NaiveDate {
    add_days(next_period_start, -LUTEAL_LENGTH_DAYS)
}

/// Fertile window around an ovulation day: ovulation - 5 to ovulation + 1, inclusive.
pub fn fertile_window_for(ovulation_day: NaiveDate) -> CycleWindow {
    CycleWindow {
        start: add_days(ovulation_day, -FERTILE_LEAD_DAYS),
        end: add_days(ovulation_day, FERTILE_TAIL_DAYS),
    }
}

/// Classify a single calendar day against the recorded history.
///
/// Recorded period days always win. Between two recorded starts the
/// ovulation day is derived from the later start; after the latest start,
/// cycles are projected forward with `settings.cycle_length`.
pub fn classify_day(
    day: NaiveDate,
    history: &[CycleEvent],
    settings: &CycleSettings,
) -> DayClassification {
    classify_in(day, &History::new(history), settings)
}

pub(crate) fn classify_in(
    day: NaiveDate,
    history: &History<'_>,
    settings: &CycleSettings,
) -> DayClassification {
    if history
        .iter()
        .any(|e| e.period_window(settings.period_length).contains(day))
    {
        return DayClassification::Period;
    }

    let Some(anchor) = history.resolve_anchor(day) else {
        return DayClassification::Safe;
    };

    let ovulation_day = match anchor.closing {
        Some(closing) => {
            if day >= closing.start_date {
                return DayClassification::Safe;
            }
            ovulation_for(closing.start_date)
        }
        None => {
            // Guard against a zero cycle length slipping past validation.
            let cycle_length = i64::from(settings.cycle_length.max(1));
            let cycle_index = days_between(day, anchor.anchor.start_date) / cycle_length;
            let Some(cycle_start) =
                checked_add_days(anchor.anchor.start_date, cycle_index * cycle_length)
            else {
                return DayClassification::Safe;
            };

            // Cycle 0 is the recorded period itself, handled above.
            if cycle_index >= 1 && projected_period(cycle_start, settings).contains(day) {
                return DayClassification::Period;
            }
            let Some(next_start) = checked_add_days(cycle_start, cycle_length) else {
                return DayClassification::Safe;
            };
            ovulation_for(next_start)
        }
    };

    if day == ovulation_day {
        DayClassification::Ovulation
    } else if fertile_window_for(ovulation_day).contains(day) {
        DayClassification::Fertile
    } else {
        DayClassification::Safe
    }
}

/// Classify every day of a month, or `None` for a month that does not exist.
pub fn classify_month(
    year: i32,
    month: u32,
    history: &[CycleEvent],
    settings: &CycleSettings,
) -> Option<Vec<(NaiveDate, DayClassification)>> {
    let (first, last) = month_bounds(year, month)?;
    let history = History::new(history);
    tracing::trace!(year, month, events = history.len(), "classifying month");

    Some(
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| (d, classify_in(d, &history, settings)))
            .collect(),
    )
}

/// Next predicted period, ovulation, fertile window and the current phase.
///
/// With an empty history, or a cycle length that runs off the calendar,
/// every field is absent and the phase is `Unknown`.
pub fn summarize_today(
    today: NaiveDate,
    history: &[CycleEvent],
    settings: &CycleSettings,
) -> TodaySummary {
    let history = History::new(history);
    let next_start = history
        .latest()
        .and_then(|last| checked_add_days(last.start_date, i64::from(settings.cycle_length)));
    let (Some(last), Some(next_start)) = (history.latest(), next_start) else {
        return TodaySummary {
            next_period_window: None,
            ovulation_date: None,
            fertile_window: None,
            current_period: None,
            phase_info: PhaseInfo::unknown(),
            days_until_next_period: None,
        };
    };

    let next_period_window = projected_period(next_start, settings);
    let ovulation_date = ovulation_for(next_start);

    let current_period = history
        .iter()
        .find(|e| e.period_window(settings.period_length).contains(today))
        .cloned();

    TodaySummary {
        next_period_window: Some(next_period_window),
        ovulation_date: Some(ovulation_date),
        fertile_window: Some(fertile_window_for(ovulation_date)),
        current_period,
        phase_info: phase_info(today, last.start_date, ovulation_date, settings),
        days_until_next_period: Some(days_between(next_start, today)),
    }
}

/// Phase of `today` within the cycle that began at `cycle_start`.
///
/// Order matters: the ovulation day must be matched before the
/// before/after split.
fn phase_info(
    today: NaiveDate,
    cycle_start: NaiveDate,
    ovulation_day: NaiveDate,
    settings: &CycleSettings,
) -> PhaseInfo {
    let day_of_cycle = days_between(today, cycle_start) + 1;
    if day_of_cycle < 1 {
        return PhaseInfo::unknown();
    }

    if day_of_cycle <= i64::from(settings.period_length) {
        let n = to_count(day_of_cycle);
        PhaseInfo {
            phase: CyclePhase::Menstrual,
            day_label: format!("Period day {n}"),
            day_in_phase: n,
        }
    } else if today == ovulation_day {
        PhaseInfo {
            phase: CyclePhase::Ovulation,
            day_label: "Ovulation day".into(),
            day_in_phase: 1,
        }
    } else if today < ovulation_day {
        let n = to_count(day_of_cycle);
        PhaseInfo {
            phase: CyclePhase::Follicular,
            day_label: format!("Cycle day {n}"),
            day_in_phase: n,
        }
    } else {
        let dpo = to_count(days_between(today, ovulation_day));
        PhaseInfo {
            phase: CyclePhase::Luteal,
            day_label: format!("{dpo} DPO"),
            day_in_phase: dpo,
        }
    }
}

fn projected_period(start: NaiveDate, settings: &CycleSettings) -> CycleWindow {
    CycleWindow {
        start,
        end: add_days(start, i64::from(settings.period_length) - 1),
    }
}

fn to_count(days: i64) -> u32 {
    u32::try_from(days).unwrap_or(u32::MAX)
}
