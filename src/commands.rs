use chrono::NaiveDate;
use std::sync::Mutex;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::accuracy;
use crate::advice::{self, Advice};
use crate::crypto::CryptoError;
use crate::models::*;
use crate::prediction;
use crate::reminders;
use crate::storage::{StorageError, Vault};
use crate::{Error, Result};

/// Tracker state: the vault, plus the passphrase and decrypted data while unlocked.
pub struct AppState {
    vault: Vault,
    defaults: CycleSettings,
    passphrase: Mutex<Option<String>>,
    data: Mutex<Option<AppData>>,
    /// Summary for the last reference day asked for; cleared on every change.
    today_cache: Mutex<Option<(NaiveDate, TodaySummary)>>,
}

impl AppState {
    pub fn new(vault: Vault, defaults: CycleSettings) -> Self {
        Self {
            vault,
            defaults,
            passphrase: Mutex::new(None),
            data: Mutex::new(None),
            today_cache: Mutex::new(None),
        }
    }

    /// Lock: zeroize the passphrase and drop data from memory.
    pub fn lock(&self) {
        if let Ok(mut pass) = self.passphrase.lock() {
            if let Some(ref mut p) = *pass {
                p.zeroize();
            }
            *pass = None;
        }
        if let Ok(mut data) = self.data.lock() {
            *data = None;
        }
        self.invalidate();
    }

    pub fn is_unlocked(&self) -> bool {
        self.data.lock().map(|d| d.is_some()).unwrap_or(false)
    }

    fn invalidate(&self) {
        if let Ok(mut cache) = self.today_cache.lock() {
            *cache = None;
        }
    }

    fn read<T>(&self, f: impl FnOnce(&AppData) -> Result<T>) -> Result<T> {
        let data_lock = self.data.lock()?;
        let data = data_lock.as_ref().ok_or(Error::Locked)?;
        f(data)
    }

    /// Apply a change to the unlocked data and persist it.
    fn update<T>(&self, f: impl FnOnce(&mut AppData) -> Result<T>) -> Result<T> {
        self.apply(|data| f(data).map(|out| (out, true)))
    }

    /// Like `update`, but `None` means nothing changed and nothing is written.
    fn modify<T>(&self, f: impl FnOnce(&mut AppData) -> Result<Option<T>>) -> Result<Option<T>> {
        self.apply(|data| {
            f(data).map(|out| {
                let changed = out.is_some();
                (out, changed)
            })
        })
    }

    /// Check, mutate and write under one hold of the passphrase and data locks.
    fn apply<T>(&self, f: impl FnOnce(&mut AppData) -> Result<(T, bool)>) -> Result<T> {
        let pass_lock = self.passphrase.lock()?;
        let mut data_lock = self.data.lock()?;
        let (Some(pass), Some(data)) = (pass_lock.as_ref(), data_lock.as_mut()) else {
            return Err(Error::Locked);
        };
        let (out, changed) = f(data)?;
        if changed {
            self.invalidate();
            self.vault.save(pass, data)?;
        }
        Ok(out)
    }
}

/// Longest cycle the tracker accepts, in days.
pub const MAX_CYCLE_LENGTH: u32 = 365;

/// Settings the engine can work with: both lengths positive, period shorter
/// than cycle, cycle no longer than `MAX_CYCLE_LENGTH`.
pub fn validate_settings(settings: &CycleSettings) -> Result<()> {
    if settings.cycle_length == 0 || settings.period_length == 0 {
        return Err(Error::InvalidSettings(
            "cycle and period lengths must be positive".into(),
        ));
    }
    if settings.period_length >= settings.cycle_length {
        return Err(Error::InvalidSettings(format!(
            "period length ({}) must be shorter than cycle length ({})",
            settings.period_length, settings.cycle_length
        )));
    }
    if settings.cycle_length > MAX_CYCLE_LENGTH {
        return Err(Error::InvalidSettings(format!(
            "cycle length ({}) must be at most {MAX_CYCLE_LENGTH} days",
            settings.cycle_length
        )));
    }
    Ok(())
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}

pub fn is_setup(state: &AppState) -> bool {
    state.vault.exists()
}

pub fn setup(passphrase: String, state: &AppState) -> Result<()> {
    if state.vault.exists() {
        return Err(Error::AlreadySetUp);
    }
    let mut data = AppData::default();
    data.settings.cycle = state.defaults;
    state.vault.save(&passphrase, &data)?;
    tracing::info!(path = %state.vault.path().display(), "vault created");

    *state.passphrase.lock()? = Some(passphrase);
    *state.data.lock()? = Some(data);
    state.invalidate();
    Ok(())
}

/// Returns `false` for a wrong passphrase.
pub fn unlock(passphrase: String, state: &AppState) -> Result<bool> {
    if !state.vault.exists() {
        return Err(Error::NotSetUp);
    }
    match state.vault.load(&passphrase) {
        Ok(data) => {
            *state.passphrase.lock()? = Some(passphrase);
            *state.data.lock()? = Some(data);
            state.invalidate();
            tracing::debug!("unlocked");
            Ok(true)
        }
        Err(StorageError::Crypto(CryptoError::Decryption)) => {
            tracing::warn!("unlock failed: wrong passphrase");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn lock(state: &AppState) {
    state.lock();
}

/// Record the start of a period.
///
/// Rejected if `[date, date + period_length - 1]` would overlap a recorded period.
pub fn log_period_start(date: NaiveDate, state: &AppState) -> Result<CycleEvent> {
    state.update(|data| {
        let period_length = data.settings.cycle.period_length;
        let proposed = CycleEvent::new(date);
        let window = proposed.period_window(period_length);
        if let Some(existing) = data.periods.iter().find(|p| {
            let other = p.period_window(period_length);
            window.start <= other.end && other.start <= window.end
        }) {
            return Err(Error::InvalidDate(format!(
                "{date} would overlap the period starting {}",
                existing.start_date
            )));
        }
        data.periods.push(proposed.clone());
        data.periods.sort_by_key(|p| p.start_date);
        tracing::info!(start = %date, "period start logged");
        Ok(proposed)
    })
}

/// Close a period. The end must not precede its start or reach the next recorded start.
pub fn log_period_end(id: Uuid, end: NaiveDate, state: &AppState) -> Result<CycleEvent> {
    state.update(|data| {
        let start = data
            .periods
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.start_date)
            .ok_or_else(|| Error::NotFound(format!("period {id}")))?;
        if end < start {
            return Err(Error::InvalidDate(format!("end {end} is before start {start}")));
        }
        let next_start = data
            .periods
            .iter()
            .map(|p| p.start_date)
            .filter(|s| *s > start)
            .min();
        if let Some(next) = next_start.filter(|next| end >= *next) {
            return Err(Error::InvalidDate(format!(
                "end {end} reaches the next period starting {next}"
            )));
        }

        let period = data
            .periods
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("period {id}")))?;
        period.end_date = Some(end);
        tracing::info!(start = %start, end = %end, "period end logged");
        Ok(period.clone())
    })
}

pub fn remove_period(id: Uuid, state: &AppState) -> Result<()> {
    state.update(|data| {
        let before = data.periods.len();
        data.periods.retain(|p| p.id != id);
        if data.periods.len() == before {
            return Err(Error::NotFound(format!("period {id}")));
        }
        tracing::info!(%id, "period removed");
        Ok(())
    })
}

pub fn list_periods(state: &AppState) -> Result<Vec<CycleEvent>> {
    state.read(|data| {
        let mut periods = data.periods.clone();
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    })
}

pub fn get_settings(state: &AppState) -> Result<AppSettings> {
    state.read(|data| Ok(data.settings.clone()))
}

pub fn update_cycle_settings(
    cycle_length: u32,
    period_length: u32,
    state: &AppState,
) -> Result<()> {
    let settings = CycleSettings {
        cycle_length,
        period_length,
    };
    validate_settings(&settings)?;
    state.update(|data| {
        data.settings.cycle = settings;
        tracing::info!(cycle_length, period_length, "cycle settings updated");
        Ok(())
    })
}

pub fn toggle_pregnancy_mode(enabled: bool, state: &AppState) -> Result<()> {
    state.update(|data| {
        data.settings.pregnancy_mode = enabled;
        tracing::info!(enabled, "pregnancy mode toggled");
        Ok(())
    })
}

pub fn update_notifications(notifications: NotificationSettings, state: &AppState) -> Result<()> {
    state.update(|data| {
        data.settings.notifications = notifications;
        Ok(())
    })
}

/// Save the symptom log for its day, replacing any earlier entry for that day.
pub fn log_symptoms(log: SymptomLog, state: &AppState) -> Result<()> {
    state.update(|data| {
        if let Some(existing) = data.symptoms.iter_mut().find(|s| s.date == log.date) {
            *existing = log;
        } else {
            data.symptoms.push(log);
        }
        data.symptoms.sort_by_key(|s| s.date);
        Ok(())
    })
}

pub fn symptom_trend(state: &AppState) -> Result<Vec<SymptomScores>> {
    state.read(|data| {
        let mut points: Vec<SymptomScores> = data.symptoms.iter().map(|s| s.scores()).collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    })
}

/// Returns `None` when the day already has an activity.
pub fn log_activity(date: NaiveDate, note: String, state: &AppState) -> Result<Option<ActivityLog>> {
    state.modify(|data| {
        if data.activities.iter().any(|a| a.date == date) {
            return Ok(None);
        }
        let entry = ActivityLog {
            id: Uuid::new_v4(),
            date,
            note,
        };
        data.activities.push(entry.clone());
        data.activities.sort_by_key(|a| a.date);
        Ok(Some(entry))
    })
}

pub fn remove_activity(id: Uuid, state: &AppState) -> Result<()> {
    state.update(|data| {
        let before = data.activities.len();
        data.activities.retain(|a| a.id != id);
        if data.activities.len() == before {
            return Err(Error::NotFound(format!("activity {id}")));
        }
        Ok(())
    })
}

/// Summary for `today`, or `None` while pregnancy mode pauses tracking.
pub fn get_today(today: NaiveDate, state: &AppState) -> Result<Option<TodaySummary>> {
    state.read(|data| {
        if data.settings.pregnancy_mode {
            return Ok(None);
        }

        let mut cache = state.today_cache.lock()?;
        if let Some((day, summary)) = cache.as_ref() {
            if *day == today {
                return Ok(Some(summary.clone()));
            }
        }
        let summary = prediction::summarize_today(today, &data.periods, &data.settings.cycle);
        *cache = Some((today, summary.clone()));
        Ok(Some(summary))
    })
}

pub fn get_month(year: i32, month: u32, state: &AppState) -> Result<MonthData> {
    state.read(|data| {
        let grid = prediction::classify_month(year, month, &data.periods, &data.settings.cycle)
            .ok_or_else(|| Error::InvalidDate(format!("{year}-{month:02}")))?;
        let pregnancy_mode = data.settings.pregnancy_mode;

        let days = grid
            .into_iter()
            .map(|(date, classification)| CalendarDay {
                date,
                classification: if pregnancy_mode {
                    DayClassification::Safe
                } else {
                    classification
                },
                has_activity: data.activities.iter().any(|a| a.date == date),
                symptom: data.symptoms.iter().find(|s| s.date == date).cloned(),
            })
            .collect();

        Ok(MonthData {
            year,
            month,
            days,
            pregnancy_mode,
        })
    })
}

pub fn get_accuracy(state: &AppState) -> Result<u8> {
    state.read(|data| Ok(accuracy::estimate_accuracy(&data.periods)))
}

/// Advice for today's phase, personalised by today's symptom log if any.
pub fn get_advice(today: NaiveDate, state: &AppState) -> Result<Advice> {
    let phase = get_today(today, state)?
        .map(|s| s.phase_info.phase)
        .unwrap_or(CyclePhase::Unknown);
    state.read(|data| {
        let symptom = data.symptoms.iter().find(|s| s.date == today);
        Ok(advice::advice_for(phase, symptom))
    })
}

/// Add today's due reminders to the inbox, once per kind and day.
pub fn check_reminders(today: NaiveDate, state: &AppState) -> Result<Vec<AppNotification>> {
    let Some(summary) = get_today(today, state)? else {
        return Ok(Vec::new());
    };
    let added = state.modify(|data| {
        let added: Vec<AppNotification> =
            reminders::due_reminders(today, &summary, &data.settings.notifications)
                .into_iter()
                .filter(|r| {
                    !data
                        .notifications
                        .iter()
                        .any(|n| n.date == today && n.kind == r.kind)
                })
                .map(|r| AppNotification {
                    id: Uuid::new_v4(),
                    date: today,
                    kind: r.kind,
                    message: r.message,
                    read: false,
                })
                .collect();
        if added.is_empty() {
            return Ok(None);
        }
        tracing::debug!(count = added.len(), "reminders due");
        data.notifications.extend(added.iter().cloned());
        Ok(Some(added))
    })?;
    Ok(added.unwrap_or_default())
}

/// Inbox, newest first.
pub fn list_notifications(state: &AppState) -> Result<Vec<AppNotification>> {
    state.read(|data| {
        let mut list = data.notifications.clone();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    })
}

/// Mark every unread notification read; returns how many changed.
pub fn mark_notifications_read(state: &AppState) -> Result<usize> {
    state.update(|data| {
        let mut changed = 0;
        for n in data.notifications.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    })
}

pub fn export_data(state: &AppState) -> Result<String> {
    state.read(|data| Ok(serde_json::to_string_pretty(data)?))
}

pub fn wipe_all_data(state: &AppState) -> Result<()> {
    state.lock();
    Ok(state.vault.wipe()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::reminders::ReminderKind;
    use tempfile::TempDir;

    const FAST: KdfParams = KdfParams {
        memory_kib: 256,
        iterations: 1,
    };

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn unlocked() -> (TempDir, AppState) {
        crate::logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Vault::new(dir.path(), FAST), CycleSettings::default());
        setup("pass".into(), &state).unwrap();
        (dir, state)
    }

    #[test]
    fn setup_lock_unlock() {
        let (_dir, state) = unlocked();
        assert!(is_setup(&state));
        assert!(matches!(setup("again".into(), &state), Err(Error::AlreadySetUp)));

        log_period_start(d("2024-01-01"), &state).unwrap();
        lock(&state);
        assert!(!state.is_unlocked());
        assert!(matches!(list_periods(&state), Err(Error::Locked)));

        assert!(!unlock("wrong".into(), &state).unwrap());
        assert!(unlock("pass".into(), &state).unwrap());
        assert_eq!(list_periods(&state).unwrap().len(), 1);
    }

    #[test]
    fn unlock_without_vault() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Vault::new(dir.path(), FAST), CycleSettings::default());
        assert!(matches!(unlock("pass".into(), &state), Err(Error::NotSetUp)));
    }

    #[test]
    fn period_lifecycle() {
        let (_dir, state) = unlocked();
        let second = log_period_start(d("2024-01-29"), &state).unwrap();
        let first = log_period_start(d("2024-01-01"), &state).unwrap();

        // Starting inside a recorded period is refused.
        assert!(matches!(
            log_period_start(d("2024-01-03"), &state),
            Err(Error::InvalidDate(_))
        ));

        let starts: Vec<_> = list_periods(&state)
            .unwrap()
            .into_iter()
            .map(|p| p.start_date)
            .collect();
        assert_eq!(starts, vec![d("2024-01-01"), d("2024-01-29")]);

        assert!(matches!(
            log_period_end(first.id, d("2023-12-31"), &state),
            Err(Error::InvalidDate(_))
        ));
        let ended = log_period_end(first.id, d("2024-01-06"), &state).unwrap();
        assert_eq!(ended.end_date, Some(d("2024-01-06")));

        remove_period(second.id, &state).unwrap();
        assert!(matches!(
            remove_period(second.id, &state),
            Err(Error::NotFound(_))
        ));
        assert_eq!(list_periods(&state).unwrap().len(), 1);
    }

    #[test]
    fn period_start_rejects_any_overlap() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-29"), &state).unwrap();

        // 2024-01-27 + 5 days runs into the period starting 2024-01-29.
        assert!(matches!(
            log_period_start(d("2024-01-27"), &state),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            log_period_start(d("2024-02-02"), &state),
            Err(Error::InvalidDate(_))
        ));
        log_period_start(d("2024-01-24"), &state).unwrap();
        log_period_start(d("2024-02-03"), &state).unwrap();
        assert_eq!(list_periods(&state).unwrap().len(), 3);
    }

    #[test]
    fn period_end_stops_before_next_start() {
        let (_dir, state) = unlocked();
        let first = log_period_start(d("2024-01-01"), &state).unwrap();
        log_period_start(d("2024-01-29"), &state).unwrap();

        assert!(matches!(
            log_period_end(first.id, d("2024-02-10"), &state),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            log_period_end(first.id, d("2024-01-29"), &state),
            Err(Error::InvalidDate(_))
        ));
        let ended = log_period_end(first.id, d("2024-01-28"), &state).unwrap();
        assert_eq!(ended.end_date, Some(d("2024-01-28")));

        // The latest period has no successor to run into.
        let last = log_period_start(d("2024-03-01"), &state).unwrap();
        assert!(log_period_end(last.id, d("2024-03-20"), &state).is_ok());
    }

    #[test]
    fn settings_are_validated() {
        let (_dir, state) = unlocked();
        assert!(matches!(
            update_cycle_settings(0, 5, &state),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            update_cycle_settings(28, 28, &state),
            Err(Error::InvalidSettings(_))
        ));
        update_cycle_settings(30, 4, &state).unwrap();
        assert_eq!(get_settings(&state).unwrap().cycle.cycle_length, 30);
    }

    #[test]
    fn oversized_cycle_length_is_rejected() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();
        for cycle_length in [u32::MAX, MAX_CYCLE_LENGTH + 1] {
            assert!(matches!(
                update_cycle_settings(cycle_length, 5, &state),
                Err(Error::InvalidSettings(_))
            ));
        }
        update_cycle_settings(MAX_CYCLE_LENGTH, 5, &state).unwrap();

        let summary = get_today(d("2024-01-20"), &state).unwrap().unwrap();
        assert_eq!(summary.phase_info.phase, CyclePhase::Follicular);
        assert_eq!(get_month(2024, 12, &state).unwrap().days.len(), 31);
    }

    #[test]
    fn today_summary_is_cached_until_data_changes() {
        let (_dir, state) = unlocked();
        let today = d("2024-01-20");
        assert_eq!(
            get_today(today, &state).unwrap().unwrap().phase_info.phase,
            CyclePhase::Unknown
        );

        log_period_start(d("2024-01-01"), &state).unwrap();
        let summary = get_today(today, &state).unwrap().unwrap();
        assert_eq!(summary.phase_info.phase, CyclePhase::Luteal);
        assert_eq!(get_today(today, &state).unwrap().unwrap(), summary);

        update_cycle_settings(35, 5, &state).unwrap();
        let summary = get_today(today, &state).unwrap().unwrap();
        assert_eq!(summary.ovulation_date, Some(d("2024-01-22")));
        assert_eq!(summary.phase_info.phase, CyclePhase::Follicular);
    }

    #[test]
    fn pregnancy_mode_pauses_predictions() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();
        toggle_pregnancy_mode(true, &state).unwrap();

        assert!(get_today(d("2024-01-15"), &state).unwrap().is_none());
        let month = get_month(2024, 1, &state).unwrap();
        assert!(month.pregnancy_mode);
        assert!(month
            .days
            .iter()
            .all(|day| day.classification == DayClassification::Safe));
        assert!(check_reminders(d("2024-01-15"), &state).unwrap().is_empty());

        toggle_pregnancy_mode(false, &state).unwrap();
        assert!(get_today(d("2024-01-15"), &state).unwrap().is_some());
    }

    #[test]
    fn month_view_marks_activity_and_symptoms() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();
        assert!(log_activity(d("2024-01-12"), "".into(), &state).unwrap().is_some());
        assert!(log_activity(d("2024-01-12"), "dup".into(), &state).unwrap().is_none());
        log_symptoms(
            SymptomLog {
                date: d("2024-01-02"),
                mood: Mood::Calm,
                pain: Pain::Light,
                flow: FlowLevel::Heavy,
            },
            &state,
        )
        .unwrap();

        let month = get_month(2024, 1, &state).unwrap();
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days[0].classification, DayClassification::Period);
        assert_eq!(month.days[14].classification, DayClassification::Ovulation);
        assert!(month.days[11].has_activity);
        assert_eq!(
            month.days[1].symptom.as_ref().map(|s| s.flow),
            Some(FlowLevel::Heavy)
        );
        assert!(matches!(get_month(2024, 13, &state), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn concurrent_activity_logs_keep_one_per_day() {
        let (_dir, state) = unlocked();
        let day = d("2024-01-12");

        let logged: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let state = &state;
                    scope.spawn(move || {
                        log_activity(day, format!("entry {i}"), state)
                            .unwrap()
                            .is_some()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(logged.iter().filter(|added| **added).count(), 1);
        let month = get_month(2024, 1, &state).unwrap();
        assert_eq!(month.days.iter().filter(|day| day.has_activity).count(), 1);
        lock(&state);
        assert!(unlock("pass".into(), &state).unwrap());
        assert!(get_month(2024, 1, &state).unwrap().days[11].has_activity);
    }

    #[test]
    fn symptoms_upsert_by_day() {
        let (_dir, state) = unlocked();
        let mut log = SymptomLog {
            date: d("2024-01-02"),
            mood: Mood::Happy,
            pain: Pain::None,
            flow: FlowLevel::Light,
        };
        log_symptoms(log.clone(), &state).unwrap();
        log.mood = Mood::Sad;
        log_symptoms(log, &state).unwrap();

        let trend = symptom_trend(&state).unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].mood, 1);
        assert_eq!(trend[0].flow, 1);
    }

    #[test]
    fn advice_follows_phase_and_symptoms() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();
        log_symptoms(
            SymptomLog {
                date: d("2024-01-02"),
                mood: Mood::Irritable,
                pain: Pain::Moderate,
                flow: FlowLevel::Medium,
            },
            &state,
        )
        .unwrap();
        let a = get_advice(d("2024-01-02"), &state).unwrap();
        assert_eq!(
            a,
            advice::advice_for(
                CyclePhase::Menstrual,
                Some(&SymptomLog {
                    date: d("2024-01-02"),
                    mood: Mood::Irritable,
                    pain: Pain::Moderate,
                    flow: FlowLevel::Medium,
                })
            )
        );
    }

    #[test]
    fn reminders_are_added_once() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();

        let added = check_reminders(d("2024-01-15"), &state).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].kind, ReminderKind::Ovulation);
        assert!(check_reminders(d("2024-01-15"), &state).unwrap().is_empty());

        check_reminders(d("2024-01-29"), &state).unwrap();
        let inbox = list_notifications(&state).unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].date, d("2024-01-29"));

        assert_eq!(mark_notifications_read(&state).unwrap(), 2);
        assert_eq!(mark_notifications_read(&state).unwrap(), 0);
    }

    #[test]
    fn concurrent_reminder_checks_add_each_once() {
        let (_dir, state) = unlocked();
        log_period_start(d("2024-01-01"), &state).unwrap();
        let today = d("2024-01-15");

        let added: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let state = &state;
                    scope.spawn(move || check_reminders(today, state).unwrap().len())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(added, 1);
        assert_eq!(list_notifications(&state).unwrap().len(), 1);
    }

    #[test]
    fn accuracy_export_and_wipe() {
        let (_dir, state) = unlocked();
        assert_eq!(get_accuracy(&state).unwrap(), 85);
        for start in ["2024-01-01", "2024-01-29", "2024-02-28", "2024-03-25"] {
            log_period_start(d(start), &state).unwrap();
        }
        assert_eq!(get_accuracy(&state).unwrap(), 50);

        let json = export_data(&state).unwrap();
        assert!(json.contains("2024-03-25"));

        wipe_all_data(&state).unwrap();
        assert!(!is_setup(&state));
        assert!(!state.is_unlocked());
    }
}
