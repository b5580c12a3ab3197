//! Host server configuration from the environment.
//!
//! `main` loads `.env` through `dotenvy` before calling `ServerConfig::from_env`,
//! so values may come from either place.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Upstream for `/api/*`, without a trailing slash.
    pub api_base_url: String,
    pub proxy_timeout: Duration,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let proxy_timeout_secs = parse_or(&lookup, "PROXY_TIMEOUT_SECS", DEFAULT_PROXY_TIMEOUT_SECS)?;
        let api_base_url = lookup("API_BASE_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let log_json = lookup("LOG_JSON").and_then(|raw| parse_bool(&raw)).unwrap_or(false);

        Ok(Self { port, api_base_url, proxy_timeout: Duration::from_secs(proxy_timeout_secs), log_json })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
