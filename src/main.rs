use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

use lune::commands::{self, AppState};
use lune::storage::Vault;
use lune::{
    Config, CustomReminder, DayClassification, Error, FlowLevel, Mood, Pain, Result,
    SymptomLog, TodaySummary,
};

#[derive(Parser)]
#[command(name = "lune")]
#[command(about = "Private, on-device cycle tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/lune/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Vault passphrase
    #[arg(long, global = true, env = "LUNE_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Reference day instead of the local date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new encrypted vault
    Init,
    /// Record, end, remove or list periods
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },
    /// Current phase and upcoming dates
    Today,
    /// Month calendar with day classifications
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// How well past period starts would have been predicted
    Accuracy,
    /// Show or change cycle settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Pause or resume tracking for pregnancy
    Pregnancy {
        #[arg(value_enum)]
        mode: Toggle,
    },
    /// Log symptoms or show their trend
    Symptoms {
        #[command(subcommand)]
        action: SymptomAction,
    },
    /// Log or remove an activity
    Activity {
        #[command(subcommand)]
        action: ActivityAction,
    },
    /// Nutrition and wellness tips for today
    Advice,
    /// Reminders and the notification inbox
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },
    /// Print all data as JSON
    Export,
    /// Permanently delete the vault
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PeriodAction {
    /// Period started (default: today)
    Start {
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// Period ended (default: today)
    End {
        id: Uuid,
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    Remove {
        id: Uuid,
    },
    List,
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        cycle_length: Option<u32>,
        #[arg(long)]
        period_length: Option<u32>,
    },
}

#[derive(Subcommand)]
enum SymptomAction {
    Log {
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum)]
        mood: MoodArg,
        #[arg(long, value_enum, default_value = "none")]
        pain: PainArg,
        #[arg(long, value_enum, default_value = "none")]
        flow: FlowArg,
    },
    Trend,
}

#[derive(Subcommand)]
enum ActivityAction {
    Add {
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        note: String,
    },
    Remove {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum NotifyAction {
    /// Add today's due reminders to the inbox and print them
    Check,
    List,
    /// Mark all notifications read
    Read,
    Set {
        #[arg(long)]
        period: Option<bool>,
        #[arg(long)]
        ovulation: Option<bool>,
        /// Days ahead of the period; 0 disables
        #[arg(long)]
        before_period: Option<u32>,
        /// Days ahead of ovulation; 0 disables
        #[arg(long)]
        before_ovulation: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum MoodArg {
    Happy,
    Calm,
    Sad,
    Irritable,
    Energetic,
}

#[derive(Clone, Copy, ValueEnum)]
enum PainArg {
    None,
    Light,
    Moderate,
    Severe,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlowArg {
    None,
    Light,
    Medium,
    Heavy,
}

impl From<MoodArg> for Mood {
    fn from(m: MoodArg) -> Self {
        match m {
            MoodArg::Happy => Mood::Happy,
            MoodArg::Calm => Mood::Calm,
            MoodArg::Sad => Mood::Sad,
            MoodArg::Irritable => Mood::Irritable,
            MoodArg::Energetic => Mood::Energetic,
        }
    }
}

impl From<PainArg> for Pain {
    fn from(p: PainArg) -> Self {
        match p {
            PainArg::None => Pain::None,
            PainArg::Light => Pain::Light,
            PainArg::Moderate => Pain::Moderate,
            PainArg::Severe => Pain::Severe,
        }
    }
}

impl From<FlowArg> for FlowLevel {
    fn from(f: FlowArg) -> Self {
        match f {
            FlowArg::None => FlowLevel::None,
            FlowArg::Light => FlowLevel::Light,
            FlowArg::Medium => FlowLevel::Medium,
            FlowArg::Heavy => FlowLevel::Heavy,
        }
    }
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    commands::parse_date(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // An explicit --config must exist; the default path is optional.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let found = cli.config.is_some() || config_path.exists();
    let config = if found {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };
    lune::logging::init_with_level(&config.logging.level);
    if found {
        tracing::info!("Loaded config from {:?}", config_path);
    } else {
        tracing::info!("No config file found at {:?}, using defaults", config_path);
    }

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let state = AppState::new(
        Vault::new(&data_dir, config.vault.kdf()),
        config.cycle.settings(),
    );
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let passphrase = cli.passphrase.clone().ok_or(Error::MissingPassphrase)?;

    if let Commands::Init = cli.command {
        commands::setup(passphrase, &state)?;
        println!("Vault created at {}", data_dir.display());
        return Ok(());
    }
    if !commands::unlock(passphrase, &state)? {
        return Err(Error::WrongPassphrase);
    }

    let result = dispatch(&cli, &state, today);
    commands::lock(&state);
    result
}

fn dispatch(cli: &Cli, state: &AppState, today: NaiveDate) -> Result<()> {
    let json = cli.json;
    match &cli.command {
        Commands::Init => Err(Error::AlreadySetUp),
        Commands::Period { action } => match action {
            PeriodAction::Start { date } => {
                let event = commands::log_period_start(date.unwrap_or(today), state)?;
                println!("Period started {} ({})", event.start_date, event.id);
                Ok(())
            }
            PeriodAction::End { id, date } => {
                let event = commands::log_period_end(*id, date.unwrap_or(today), state)?;
                if let Some(end) = event.end_date {
                    println!("Period {} - {} recorded", event.start_date, end);
                }
                Ok(())
            }
            PeriodAction::Remove { id } => {
                commands::remove_period(*id, state)?;
                println!("Period removed");
                Ok(())
            }
            PeriodAction::List => {
                let periods = commands::list_periods(state)?;
                if json {
                    return print_json(&periods);
                }
                for p in periods {
                    let end = p
                        .end_date
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "-".into());
                    println!("{}  {}  {}", p.id, p.start_date, end);
                }
                Ok(())
            }
        },
        Commands::Today => {
            let summary = commands::get_today(today, state)?;
            if json {
                return print_json(&summary);
            }
            match summary {
                Some(s) => print_summary(today, &s),
                None => println!("Pregnancy mode is on; cycle tracking is paused."),
            }
            Ok(())
        }
        Commands::Month { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let data = commands::get_month(year, month, state)?;
            if json {
                return print_json(&data);
            }
            print_month(&data);
            Ok(())
        }
        Commands::Accuracy => {
            let accuracy = commands::get_accuracy(state)?;
            if json {
                return print_json(&accuracy);
            }
            println!("Prediction accuracy: {accuracy}%");
            Ok(())
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let settings = commands::get_settings(state)?;
                if json {
                    return print_json(&settings);
                }
                println!("Cycle length:   {} days", settings.cycle.cycle_length);
                println!("Period length:  {} days", settings.cycle.period_length);
                println!(
                    "Pregnancy mode: {}",
                    if settings.pregnancy_mode { "on" } else { "off" }
                );
                Ok(())
            }
            SettingsAction::Set {
                cycle_length,
                period_length,
            } => {
                let current = commands::get_settings(state)?.cycle;
                commands::update_cycle_settings(
                    cycle_length.unwrap_or(current.cycle_length),
                    period_length.unwrap_or(current.period_length),
                    state,
                )?;
                println!("Settings saved");
                Ok(())
            }
        },
        Commands::Pregnancy { mode } => {
            let enabled = matches!(mode, Toggle::On);
            commands::toggle_pregnancy_mode(enabled, state)?;
            println!("Pregnancy mode {}", if enabled { "on" } else { "off" });
            Ok(())
        }
        Commands::Symptoms { action } => match action {
            SymptomAction::Log {
                date,
                mood,
                pain,
                flow,
            } => {
                commands::log_symptoms(
                    SymptomLog {
                        date: date.unwrap_or(today),
                        mood: (*mood).into(),
                        pain: (*pain).into(),
                        flow: (*flow).into(),
                    },
                    state,
                )?;
                println!("Symptoms saved");
                Ok(())
            }
            SymptomAction::Trend => {
                let trend = commands::symptom_trend(state)?;
                if json {
                    return print_json(&trend);
                }
                println!("date        mood pain flow");
                for p in trend {
                    println!("{}  {:>4} {:>4} {:>4}", p.date, p.mood, p.pain, p.flow);
                }
                Ok(())
            }
        },
        Commands::Activity { action } => match action {
            ActivityAction::Add { date, note } => {
                match commands::log_activity(date.unwrap_or(today), note.clone(), state)? {
                    Some(entry) => println!("Activity logged ({})", entry.id),
                    None => println!("Activity already logged for that day"),
                }
                Ok(())
            }
            ActivityAction::Remove { id } => {
                commands::remove_activity(*id, state)?;
                println!("Activity removed");
                Ok(())
            }
        },
        Commands::Advice => {
            let advice = commands::get_advice(today, state)?;
            if json {
                return print_json(&advice);
            }
            println!("Nutrition: {}", advice.nutrition);
            println!("Wellness:  {}", advice.wellness);
            Ok(())
        }
        Commands::Notify { action } => match action {
            NotifyAction::Check => {
                let added = commands::check_reminders(today, state)?;
                if json {
                    return print_json(&added);
                }
                for n in added {
                    println!("{}", n.message);
                }
                Ok(())
            }
            NotifyAction::List => {
                let inbox = commands::list_notifications(state)?;
                if json {
                    return print_json(&inbox);
                }
                for n in inbox {
                    let mark = if n.read { ' ' } else { '*' };
                    println!("{mark} {}  {}", n.date, n.message);
                }
                Ok(())
            }
            NotifyAction::Read => {
                let changed = commands::mark_notifications_read(state)?;
                println!("{changed} notification(s) marked read");
                Ok(())
            }
            NotifyAction::Set {
                period,
                ovulation,
                before_period,
                before_ovulation,
            } => {
                let mut n = commands::get_settings(state)?.notifications;
                n.period = period.unwrap_or(n.period);
                n.ovulation = ovulation.unwrap_or(n.ovulation);
                if let Some(days) = before_period {
                    n.before_period = lead_time(*days, n.before_period);
                }
                if let Some(days) = before_ovulation {
                    n.before_ovulation = lead_time(*days, n.before_ovulation);
                }
                commands::update_notifications(n, state)?;
                println!("Notification settings saved");
                Ok(())
            }
        },
        Commands::Export => {
            println!("{}", commands::export_data(state)?);
            Ok(())
        }
        Commands::Wipe { yes } => {
            if !yes {
                return Err(Error::Unconfirmed("wipe all data".into()));
            }
            commands::wipe_all_data(state)?;
            println!("All data deleted");
            Ok(())
        }
    }
}

fn lead_time(days: u32, current: CustomReminder) -> CustomReminder {
    if days == 0 {
        CustomReminder {
            enabled: false,
            ..current
        }
    } else {
        CustomReminder {
            enabled: true,
            days,
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(today: NaiveDate, s: &TodaySummary) {
    println!("Phase: {:?} ({})", s.phase_info.phase, s.phase_info.day_label);
    let (Some(next), Some(ovulation), Some(fertile), Some(days)) = (
        s.next_period_window,
        s.ovulation_date,
        s.fertile_window,
        s.days_until_next_period,
    ) else {
        println!("No period recorded yet. Log one with `lune period start`.");
        return;
    };

    match days {
        d if d < 0 => println!("Period is {} day(s) late", -d),
        0 => println!("Period expected today"),
        d => println!("Next period in {d} day(s)"),
    }
    println!("Next period:   {} - {}", next.start, next.end);
    println!("Ovulation:     {ovulation}");
    println!("Fertile:       {} - {}", fertile.start, fertile.end);
    if let Some(current) = &s.current_period {
        println!(
            "On period since {} (day {})",
            current.start_date,
            (today - current.start_date).num_days() + 1
        );
    }
}

fn print_month(data: &lune::MonthData) {
    let Some(first) = data.days.first() else {
        return;
    };
    println!("{}", first.date.format("%B %Y"));
    if data.pregnancy_mode {
        println!("(pregnancy mode: predictions paused)");
    }
    println!(" Mon  Tue  Wed  Thu  Fri  Sat  Sun");

    let offset = first.date.weekday().num_days_from_monday() as usize;
    let mut line = "     ".repeat(offset);
    for day in &data.days {
        let mark = match day.classification {
            DayClassification::Period => 'P',
            DayClassification::Fertile => 'F',
            DayClassification::Ovulation => 'O',
            DayClassification::Safe => '.',
        };
        let activity = if day.has_activity { '*' } else { ' ' };
        line.push_str(&format!(" {:>2}{mark}{activity}", day.date.day()));
        if day.date.weekday().num_days_from_monday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    println!("P period  F fertile  O ovulation  . low risk  * activity");
}
