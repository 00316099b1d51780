//! Configuration loading from TOML files.
//!
//! Every tunable in the evaluation pipeline (acceptance thresholds, cache
//! high-water mark, history cap, polling cadence) is injected here rather
//! than hardcoded. Secrets (the Discord webhook URL) come from the
//! environment, not the config file.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::Thresholds;
use crate::error::{ConfigError, Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub dedup: DedupConfig,
    pub history: HistoryConfig,
    pub poll: PollConfig,
    pub buff: BuffConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// High-water mark above which the dedup cache resets entirely.
    pub max_entries: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self { max_entries: 10_000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum retained accepted deals.
    pub max_entries: usize,
    /// Destination for the periodic durable snapshot.
    pub snapshot_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            snapshot_path: "deal_history.json".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between cycles.
    pub interval_secs: u64,
    /// Shorter interval used after a cycle-level failure.
    pub retry_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            retry_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuffConfig {
    pub base_url: String,
    /// Listing pages fetched per cycle.
    pub pages: u32,
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self {
            base_url: "https://buff.163.com/api/market".into(),
            pages: 3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
            .into()
        }

        if self.thresholds.max_risk <= 0.0 || self.thresholds.max_risk > 1.0 {
            return Err(invalid("thresholds.max_risk", "must be in (0, 1]"));
        }
        if self.dedup.max_entries == 0 {
            return Err(invalid("dedup.max_entries", "must be positive"));
        }
        if self.history.max_entries == 0 {
            return Err(invalid("history.max_entries", "must be positive"));
        }
        if self.history.snapshot_path.is_empty() {
            return Err(invalid("history.snapshot_path", "cannot be empty"));
        }
        if self.poll.interval_secs == 0 || self.poll.retry_secs == 0 {
            return Err(invalid("poll", "intervals must be positive"));
        }
        if self.buff.base_url.is_empty() {
            return Err(invalid("buff.base_url", "cannot be empty"));
        }
        if self.buff.pages == 0 {
            return Err(invalid("buff.pages", "must fetch at least one page"));
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
