//! Which reminders are due on a given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::add_days;
use crate::models::{NotificationSettings, TodaySummary};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    PeriodStart,
    Ovulation,
    BeforePeriod,
    BeforeOvulation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub message: String,
}

/// Reminders enabled in `settings` that fall on `today`.
pub fn due_reminders(
    today: NaiveDate,
    summary: &TodaySummary,
    settings: &NotificationSettings,
) -> Vec<Reminder> {
    let mut due = Vec::new();
    let next_start = summary.next_period_window.map(|w| w.start);

    if let Some(start) = next_start {
        if settings.period && today == start {
            due.push(Reminder {
                kind: ReminderKind::PeriodStart,
                message: "Your period is expected to start today.".into(),
            });
        }
        let before = settings.before_period;
        if before.enabled && before.days > 0 && today == add_days(start, -i64::from(before.days)) {
            due.push(Reminder {
                kind: ReminderKind::BeforePeriod,
                message: format!("Your period is expected in {} day(s).", before.days),
            });
        }
    }

    if let Some(ovulation) = summary.ovulation_date {
        if settings.ovulation && today == ovulation {
            due.push(Reminder {
                kind: ReminderKind::Ovulation,
                message: "Estimated ovulation day.".into(),
            });
        }
        let before = settings.before_ovulation;
        if before.enabled
            && before.days > 0
            && today == add_days(ovulation, -i64::from(before.days))
        {
            due.push(Reminder {
                kind: ReminderKind::BeforeOvulation,
                message: format!("Ovulation is expected in {} day(s).", before.days),
            });
        }
    }

    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomReminder, CycleEvent, CycleSettings};
    use crate::prediction::summarize_today;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn kinds_on(day: &str, settings: &NotificationSettings) -> Vec<ReminderKind> {
        let cycles = vec![CycleEvent::new(d("2024-01-01"))];
        let today = d(day);
        let summary = summarize_today(today, &cycles, &CycleSettings::default());
        due_reminders(today, &summary, settings)
            .into_iter()
            .map(|r| r.kind)
            .collect()
    }

    #[test]
    fn defaults_fire_on_the_day_itself() {
        let settings = NotificationSettings::default();
        assert_eq!(kinds_on("2024-01-29", &settings), vec![ReminderKind::PeriodStart]);
        assert_eq!(kinds_on("2024-01-15", &settings), vec![ReminderKind::Ovulation]);
        assert!(kinds_on("2024-01-27", &settings).is_empty());
    }

    #[test]
    fn custom_lead_times() {
        let settings = NotificationSettings {
            period: false,
            ovulation: false,
            before_period: CustomReminder {
                enabled: true,
                days: 2,
            },
            before_ovulation: CustomReminder {
                enabled: true,
                days: 1,
            },
        };
        assert_eq!(kinds_on("2024-01-27", &settings), vec![ReminderKind::BeforePeriod]);
        assert_eq!(kinds_on("2024-01-14", &settings), vec![ReminderKind::BeforeOvulation]);
        assert!(kinds_on("2024-01-29", &settings).is_empty());
    }

    #[test]
    fn nothing_due_without_history() {
        let summary = summarize_today(d("2024-01-01"), &[], &CycleSettings::default());
        assert!(due_reminders(d("2024-01-01"), &summary, &NotificationSettings::default()).is_empty());
    }
}
