use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowLevel {
    None,
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Irritable,
    Energetic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Pain {
    None,
    Light,
    Moderate,
    Severe,
}

/// Average cycle and period lengths, in days.
///
/// Both must be positive and `period_length < cycle_length`; callers reject
/// anything else before it reaches the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleSettings {
    #[serde(alias = "cycleLength")]
    pub cycle_length: u32,
    #[serde(alias = "periodLength")]
    pub period_length: u32,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            cycle_length: 28,
            period_length: 5,
        }
    }
}

/// One recorded period. `end_date` is filled in later by an explicit "log end".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleEvent {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CycleEvent {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date: None,
        }
    }

    /// Last day of the period: the logged end, or `period_length` days from the start.
    pub fn effective_end(&self, period_length: u32) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| crate::dates::add_days(self.start_date, i64::from(period_length) - 1))
    }

    /// Inclusive `[start_date, effective_end]` interval.
    pub fn period_window(&self, period_length: u32) -> CycleWindow {
        CycleWindow {
            start: self.start_date,
            end: self.effective_end(period_length),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayClassification {
    Period,
    Fertile,
    Ovulation,
    Safe,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseInfo {
    pub phase: CyclePhase,
    pub day_label: String,
    pub day_in_phase: u32,
}

impl PhaseInfo {
    pub fn unknown() -> Self {
        Self {
            phase: CyclePhase::Unknown,
            day_label: "pending".into(),
            day_in_phase: 0,
        }
    }
}

/// Everything the summary view needs for one reference day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodaySummary {
    pub next_period_window: Option<CycleWindow>,
    pub ovulation_date: Option<NaiveDate>,
    pub fertile_window: Option<CycleWindow>,
    pub current_period: Option<CycleEvent>,
    pub phase_info: PhaseInfo,
    /// Negative once the predicted start has passed.
    pub days_until_next_period: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomLog {
    pub date: NaiveDate,
    pub mood: Mood,
    pub pain: Pain,
    pub flow: FlowLevel,
}

/// Symptom values on the chart scale: mood 1-5, pain 0-3, flow 0-3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomScores {
    pub date: NaiveDate,
    pub mood: u8,
    pub pain: u8,
    pub flow: u8,
}

impl SymptomLog {
    pub fn scores(&self) -> SymptomScores {
        let mood = match self.mood {
            Mood::Happy => 5,
            Mood::Energetic => 4,
            Mood::Calm => 3,
            Mood::Irritable => 2,
            Mood::Sad => 1,
        };
        let pain = match self.pain {
            Pain::None => 0,
            Pain::Light => 1,
            Pain::Moderate => 2,
            Pain::Severe => 3,
        };
        let flow = match self.flow {
            FlowLevel::None => 0,
            FlowLevel::Light => 1,
            FlowLevel::Medium => 2,
            FlowLevel::Heavy => 3,
        };
        SymptomScores {
            date: self.date,
            mood,
            pain,
            flow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityLog {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomReminder {
    pub enabled: bool,
    pub days: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    pub period: bool,
    pub ovulation: bool,
    pub before_period: CustomReminder,
    pub before_ovulation: CustomReminder,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            period: true,
            ovulation: true,
            before_period: CustomReminder {
                enabled: false,
                days: 2,
            },
            before_ovulation: CustomReminder {
                enabled: false,
                days: 1,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppNotification {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: crate::reminders::ReminderKind,
    pub message: String,
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub periods: Vec<CycleEvent>,
    #[serde(default)]
    pub symptoms: Vec<SymptomLog>,
    #[serde(default)]
    pub activities: Vec<ActivityLog>,
    #[serde(default)]
    pub notifications: Vec<AppNotification>,
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    pub cycle: CycleSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub pregnancy_mode: bool,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub classification: DayClassification,
    pub has_activity: bool,
    pub symptom: Option<SymptomLog>,
}

/// Data returned for a month view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthData {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub pregnancy_mode: bool,
}
