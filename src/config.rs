//! Runtime settings.
//!
//! Layered, lowest precedence first: built-in defaults, an optional
//! `logwatch.toml`, then `LOGWATCH_*` environment variables. Command-line
//! flags are applied on top by the binary.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use logwatch_client::{ApiClient, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::queries::DASHBOARD_POLL_INTERVAL;
use crate::theme::ThemeMode;

/// Config file read when no path is given. Missing is fine.
pub const DEFAULT_CONFIG_FILE: &str = "logwatch.toml";

const ENV_PREFIX: &str = "LOGWATCH";

/// Longest accepted dashboard poll period: one day.
pub const MAX_POLL_INTERVAL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Follow the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn resolve(self) -> ThemeMode {
        match self {
            ThemeChoice::Auto => ThemeMode::detect(),
            ThemeChoice::Dark => ThemeMode::Dark,
            ThemeChoice::Light => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub timeout_ms: u64,
    /// Rows per page for the logs and recent-errors tables.
    pub page_size: u32,
    pub poll_interval_secs: u64,
    pub theme: ThemeChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            page_size: 10,
            poll_interval_secs: DASHBOARD_POLL_INTERVAL.as_secs(),
            theme: ThemeChoice::Auto,
        }
    }
}

impl Settings {
    /// Load settings from `path` (required) or from [`DEFAULT_CONFIG_FILE`]
    /// (optional), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env = Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        Self::from_sources(path, env)
    }

    fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("timeout_ms", defaults.timeout_ms as i64)?
            .set_default("page_size", i64::from(defaults.page_size))?
            .set_default("poll_interval_secs", defaults.poll_interval_secs as i64)?
            .set_default("theme", "auto")?
            .add_source(file)
            .add_source(env)
            .build()
            .context("failed to read settings")?;

        let settings: Settings = config.try_deserialize().context("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.page_size > 0, "page_size must be at least 1");
        ensure!(self.timeout_ms > 0, "timeout_ms must be at least 1");
        ensure!(
            (1..=MAX_POLL_INTERVAL_SECS).contains(&self.poll_interval_secs),
            "poll_interval_secs must be between 1 and {}",
            MAX_POLL_INTERVAL_SECS
        );
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Build an API client for these settings.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::builder()
            .base_url(&self.api_base_url)
            .timeout(self.timeout())
            .build()
            .with_context(|| format!("invalid API base URL '{}'", self.api_base_url))
    }
}
