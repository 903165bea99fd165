use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration module
/// This module handles loading, validating and saving the settings the
/// translation layer consumes: endpoint, credentials and formality.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Translate endpoint, e.g. https://api-free.deepl.com/v2/translate
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// DeepL authentication key
    #[serde(default)]
    pub api_key: String,

    /// Operator formality preference; empty disables the field
    #[serde(default)]
    pub formality: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for transport failures and 5xx responses
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Lifetime of cached language capabilities in seconds
    #[serde(default = "default_capability_ttl_secs")]
    pub capability_ttl_secs: u64,

    /// SQLite database location; the user data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Formality values the provider accepts
pub const FORMALITY_VALUES: [&str; 5] = ["default", "more", "less", "prefer_more", "prefer_less"];

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// Longest accepted capability lifetime, ten years
pub const MAX_CAPABILITY_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn default_capability_ttl_secs() -> u64 {
    86_400
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL: {}", self.api_url))?;

        if url.host_str().is_none() {
            return Err(anyhow!("API URL has no host: {}", self.api_url));
        }

        if self.api_key.trim().is_empty() {
            return Err(anyhow!("An API key is required for DeepL"));
        }

        if let Some(formality) = self.formality() {
            if !FORMALITY_VALUES.contains(&formality) {
                return Err(anyhow!(
                    "Invalid formality '{}', expected one of: {}",
                    formality,
                    FORMALITY_VALUES.join(", ")
                ));
            }
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        if self.capability_ttl_secs > MAX_CAPABILITY_TTL_SECS {
            return Err(anyhow!(
                "capability_ttl_secs must not exceed {} seconds",
                MAX_CAPABILITY_TTL_SECS
            ));
        }

        Ok(())
    }

    /// Configured formality, `None` when empty
    pub fn formality(&self) -> Option<&str> {
        let formality = self.formality.trim();
        if formality.is_empty() {
            None
        } else {
            Some(formality)
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Capability lifetime as a chrono duration, clamped to the accepted maximum
    pub fn capability_ttl(&self) -> chrono::TimeDelta {
        let secs = self.capability_ttl_secs.min(MAX_CAPABILITY_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .unwrap_or_else(|| chrono::TimeDelta::seconds(default_capability_ttl_secs() as i64))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            api_key: String::new(),
            formality: String::new(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            capability_ttl_secs: default_capability_ttl_secs(),
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}
