use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::{
    model::{EARLIEST_ARCHIVE_YEAR, Unit},
    source::RetryPolicy,
};

pub const DEFAULT_BASE_URL: &str = "https://mesonet.agron.iastate.edu/cgi-bin/request/asos.py";

/// Where and how observations are downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: retry.max_attempts,
            retry_delay_ms: u64::try_from(retry.delay.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Station offered as the default answer when prompting, e.g. "KDSM".
    pub station: Option<String>,

    /// tz database name, e.g. "America/Chicago".
    pub time_zone: Option<String>,

    /// "c" or "f".
    pub unit: Option<String>,

    pub earliest_year: Option<i32>,

    /// Example TOML:
    /// [source]
    /// max_attempts = 5
    #[serde(default)]
    pub source: SourceConfig,
}

impl Config {
    pub fn default_unit(&self) -> Result<Option<Unit>> {
        self.unit
            .as_deref()
            .map(Unit::try_from)
            .transpose()
            .context("Invalid unit in configuration")
    }

    pub fn earliest_year(&self) -> i32 {
        self.earliest_year.unwrap_or(EARLIEST_ARCHIVE_YEAR)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.source.max_attempts.max(1),
            delay: Duration::from_millis(self.source.retry_delay_ms),
        }
    }

    /// Replace the prompt defaults.
    pub fn set_defaults(&mut self, station: String, time_zone: String, unit: Unit) {
        self.station = Some(station);
        self.time_zone = Some(time_zone);
        self.unit = Some(unit.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "temprecords", "temprecords")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
