use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::rate_limit::{RateLimitConfig, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub site_url: Option<String>,
    pub static_dir: PathBuf,
    pub cors_origin: Option<String>,
    pub sentry_dsn: Option<String>,
    pub telegram: TelegramConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Reads configuration from the process environment. `.env` should
    /// already have been loaded by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let max_requests = match optional("RATE_LIMIT_MAX") {
            Some(v) => parse_number("RATE_LIMIT_MAX", &v)?,
            None => DEFAULT_MAX_REQUESTS,
        };
        let window = match optional("RATE_LIMIT_WINDOW_SECS") {
            Some(v) => Duration::from_secs(parse_number("RATE_LIMIT_WINDOW_SECS", &v)?),
            None => DEFAULT_WINDOW,
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            site_url: optional("SITE_URL"),
            static_dir: optional("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("../frontend/dist")),
            cors_origin: optional("CORS_ORIGIN"),
            sentry_dsn: optional("SENTRY_DSN"),
            telegram: TelegramConfig {
                bot_token: required("TELEGRAM_BOT_TOKEN")?,
                chat_id: required("TELEGRAM_CHAT_ID")?,
                api_base: optional("TELEGRAM_API_BASE")
                    .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            },
            rate_limit: RateLimitConfig {
                max_requests,
                window,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
