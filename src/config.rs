//! Configuration file support.
//!
//! Loaded from `$XDG_CONFIG_HOME/lune/config.toml` unless a path is given.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::crypto::KdfParams;
use crate::models::CycleSettings;
use crate::{Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seeded into new vaults; existing vaults keep their own settings.
    #[serde(default)]
    pub cycle: CycleDefaults,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_kdf_memory_kib")]
    pub kdf_memory_kib: u32,

    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_kib: default_kdf_memory_kib(),
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

impl VaultConfig {
    pub fn kdf(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.kdf_memory_kib,
            iterations: self.kdf_iterations,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleDefaults {
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,

    #[serde(default = "default_period_length")]
    pub period_length: u32,
}

impl Default for CycleDefaults {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
            period_length: default_period_length(),
        }
    }
}

impl CycleDefaults {
    pub fn settings(&self) -> CycleSettings {
        CycleSettings {
            cycle_length: self.cycle_length,
            period_length: self.period_length,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lune")
}

fn default_kdf_memory_kib() -> u32 {
    KdfParams::default().memory_kib
}

fn default_kdf_iterations() -> u32 {
    KdfParams::default().iterations
}

fn default_log_level() -> String {
    "info".into()
}

fn default_cycle_length() -> u32 {
    CycleSettings::default().cycle_length
}

fn default_period_length() -> u32 {
    CycleSettings::default().period_length
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lune")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.vault.kdf_iterations == 0 || self.vault.kdf_memory_kib < 8 {
            return Err(Error::Config(
                "vault KDF needs at least 1 iteration and 8 KiB of memory".into(),
            ));
        }
        crate::commands::validate_settings(&self.cycle.settings())
            .map_err(|e| Error::Config(e.to_string()))
    }
}
