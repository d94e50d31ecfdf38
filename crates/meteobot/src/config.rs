//! Environment configuration.
//!
//! All settings come from process environment variables (a `.env` file
//! is loaded first when present). Validation happens once at startup;
//! any failure is fatal before the message loop begins.

use derive_getters::Getters;
use meteobot_cache::CacheConfig;
use meteobot_error::{ConfigError, MeteobotResult};
use regex::Regex;
use std::time::Duration;

/// Bot token shape: numeric id, colon, token body.
const TOKEN_PATTERN: &str = r"^\d+:[A-Za-z0-9_-]+$";
/// Minimum plausible provider API key length.
const MIN_API_KEY_LEN: usize = 16;

const DEFAULT_MAX_API_URL: &str = "https://api.max.ru/v1";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_ATTEMPTS: usize = 3;

/// Validated runtime configuration.
#[derive(Debug, Clone, Getters)]
pub struct BotConfig {
    /// MAX Bot API token
    max_bot_token: String,
    /// OpenWeatherMap API key
    openweather_api_key: String,
    /// MAX Bot API base URL
    max_api_url: String,
    /// OpenWeatherMap base URL override, `None` for production
    openweather_api_url: Option<String>,
    /// Long-poll wait passed to the updates endpoint
    poll_timeout_secs: u64,
    /// Per-request HTTP timeout
    request_timeout: Duration,
    /// Retry attempts for outbound chat sends
    retry_attempts: usize,
    /// Cache sizing and sweep settings
    cache: CacheConfig,
}

impl BotConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> MeteobotResult<Self> {
        let max_bot_token = required("MAX_BOT_TOKEN")?;
        let token_pattern = Regex::new(TOKEN_PATTERN).expect("valid token regex");
        if !token_pattern.is_match(&max_bot_token) {
            return Err(ConfigError::new("MAX_BOT_TOKEN has an invalid format").into());
        }

        let openweather_api_key = required("OPENWEATHER_API_KEY")?;
        if openweather_api_key.len() < MIN_API_KEY_LEN
            || !openweather_api_key.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::new("OPENWEATHER_API_KEY has an invalid format").into());
        }

        let request_timeout_secs =
            parsed_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if !(1..=120).contains(&request_timeout_secs) {
            return Err(
                ConfigError::new("REQUEST_TIMEOUT_SECS must be between 1 and 120").into(),
            );
        }

        let poll_timeout_secs = parsed_or("POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?;
        if !(1..=90).contains(&poll_timeout_secs) {
            return Err(ConfigError::new("POLL_TIMEOUT_SECS must be between 1 and 90").into());
        }

        let retry_attempts: usize = parsed_or("RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?;
        if retry_attempts > 10 {
            return Err(ConfigError::new("RETRY_ATTEMPTS must be at most 10").into());
        }

        let cache = CacheConfig::default();
        let cache = match optional("CACHE_TTL_SECS") {
            Some(raw) => cache.with_default_ttl_secs(parse("CACHE_TTL_SECS", &raw)?),
            None => cache,
        };
        let cache = match optional("CACHE_MAX_ENTRIES") {
            Some(raw) => cache.with_max_entries(parse("CACHE_MAX_ENTRIES", &raw)?),
            None => cache,
        };
        let cache = match optional("CACHE_SWEEP_SECS") {
            Some(raw) => cache.with_sweep_interval_secs(parse("CACHE_SWEEP_SECS", &raw)?),
            None => cache,
        };

        Ok(Self {
            max_bot_token,
            openweather_api_key,
            max_api_url: optional("MAX_API_URL")
                .unwrap_or_else(|| DEFAULT_MAX_API_URL.to_string()),
            openweather_api_url: optional("OPENWEATHER_API_URL"),
            poll_timeout_secs,
            request_timeout: Duration::from_secs(request_timeout_secs),
            retry_attempts,
            cache,
        })
    }
}

fn required(name: &str) -> MeteobotResult<String> {
    match optional(name) {
        Some(value) => Ok(value),
        None => Err(ConfigError::new(format!("{} is not set", name)).into()),
    }
}

/// Read a variable, treating empty/whitespace-only values as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(name: &str, raw: &str) -> MeteobotResult<T> {
    raw.parse()
        .map_err(|_| ConfigError::new(format!("{} has an invalid value: {}", name, raw)).into())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> MeteobotResult<T> {
    match optional(name) {
        Some(raw) => parse(name, &raw),
        None => Ok(default),
    }
}
