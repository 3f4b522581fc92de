//! Bot configuration, read from shuttle secrets or the process environment.

use crate::constants::{
    BIRTHDAYS_FILE_KEY, COMMAND_PREFIX_KEY, DATABASE_URL_KEY, DEFAULT_BIRTHDAYS_FILE,
    DEFAULT_COMMAND_PREFIX, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TIMEZONE, DISCORD_TOKEN_KEY,
    SWEEP_INTERVAL_KEY, TIMEZONE_KEY,
};
use crate::error::ConfigError;
use chrono_tz::Tz;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    JsonFile { path: PathBuf },
    Postgres { database_url: String },
}

impl StoreConfig {
    /// `DATABASE_URL` wins over `BIRTHDAYS_FILE`.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match non_empty(lookup, DATABASE_URL_KEY) {
            Some(database_url) => StoreConfig::Postgres { database_url },
            None => StoreConfig::JsonFile {
                path: non_empty(lookup, BIRTHDAYS_FILE_KEY)
                    .unwrap_or_else(|| DEFAULT_BIRTHDAYS_FILE.to_string())
                    .into(),
            },
        }
    }
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub command_prefix: String,
    pub store: StoreConfig,
    pub sweep_interval: Duration,
    pub timezone: Tz,
}

// トークンはログに出さない
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("command_prefix", &self.command_prefix)
            .field("store", &self.store)
            .field("sweep_interval", &self.sweep_interval)
            .field("timezone", &self.timezone)
            .finish()
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl BotConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(&lookup, DISCORD_TOKEN_KEY)
            .ok_or(ConfigError::Missing(DISCORD_TOKEN_KEY))?;

        let command_prefix = match non_empty(&lookup, COMMAND_PREFIX_KEY) {
            Some(prefix) if prefix.chars().any(char::is_whitespace) => {
                return Err(ConfigError::Invalid {
                    key: COMMAND_PREFIX_KEY,
                    value: prefix,
                    reason: "must not contain whitespace".to_string(),
                })
            }
            Some(prefix) => prefix,
            None => DEFAULT_COMMAND_PREFIX.to_string(),
        };

        let sweep_interval = match non_empty(&lookup, SWEEP_INTERVAL_KEY) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: SWEEP_INTERVAL_KEY,
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        };

        let timezone_name =
            non_empty(&lookup, TIMEZONE_KEY).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid {
                key: TIMEZONE_KEY,
                value: timezone_name.clone(),
                reason: e.to_string(),
            })?;

        Ok(BotConfig {
            token,
            command_prefix,
            store: StoreConfig::from_lookup(&lookup),
            sweep_interval,
            timezone,
        })
    }
}
