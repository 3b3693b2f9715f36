#![forbid(unsafe_code)]

//! On-device cycle tracker.
//!
//! The engine (`anchor`, `prediction`, `accuracy`) is a set of pure functions
//! over a snapshot of recorded periods and two settings. Everything else
//! stores that snapshot in an encrypted vault and serves it to the CLI.

pub mod accuracy;
pub mod advice;
pub mod anchor;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod dates;
pub mod error;
pub mod logging;
pub mod models;
pub mod prediction;
pub mod reminders;
pub mod storage;

pub use accuracy::estimate_accuracy;
pub use anchor::{resolve_anchor, Anchor, History};
pub use config::Config;
pub use error::{Error, Result};
pub use models::*;
pub use prediction::{classify_day, classify_month, summarize_today};
