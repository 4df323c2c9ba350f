//! Runtime configuration.
//!
//! Values come from the environment with built-in defaults:
//!
//! | Variable | Default |
//! |---|---|
//! | `DISCORD_API_BASE` | `https://discord.com/api/v9` |
//! | `DISCORD_PURGE_TIMEOUT_SECS` | `30` |
//! | `DISCORD_PURGE_DATA_DIR` | platform data dir + `discord-purge` |
//!
//! Batch size and pacing are not configurable from the environment; they are
//! fixed to stay within Discord's rate limits.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::DEFAULT_API_BASE;
use crate::deletion::JobConfig;
use crate::error::ConfigError;
use crate::ledger::{default_data_dir, ledger_path};

pub const ENV_API_BASE: &str = "DISCORD_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "DISCORD_PURGE_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "DISCORD_PURGE_DATA_DIR";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeConfig {
    pub api_base: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub job: JobConfig,
}

impl PurgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base = match get(ENV_API_BASE) {
            Some(value) => parse_api_base(value)?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let request_timeout = match get(ENV_TIMEOUT_SECS) {
            Some(value) => parse_timeout(value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let data_dir = match get(ENV_DATA_DIR) {
            Some(value) => PathBuf::from(value),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self { api_base, request_timeout, data_dir, job: JobConfig::default() })
    }

    pub fn ledger_path(&self) -> PathBuf {
        ledger_path(&self.data_dir)
    }
}

fn parse_api_base(value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidValue {
            name: ENV_API_BASE,
            value,
            reason: "must be an http(s) URL".to_string(),
        })
    }
}

fn parse_timeout(value: String) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        Ok(_) => Err(ConfigError::InvalidValue {
            name: ENV_TIMEOUT_SECS,
            value,
            reason: "must be greater than zero".to_string(),
        }),
        Err(e) => Err(ConfigError::InvalidValue { name: ENV_TIMEOUT_SECS, value, reason: e.to_string() }),
    }
}
