// ABOUTME: Environment-driven configuration for the Trellis project service
// ABOUTME: Storage location, upstream service endpoints, localization fallback, and tracing setup

pub mod constants;

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number for {key}: {source}")]
    InvalidNumber {
        key: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
    #[error("Failed to install tracing subscriber: {0}")]
    TracingInit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub db_max_connections: u32,
    pub legacy_gateway_url: String,
    pub statistics_url: String,
    pub permission_url: String,
    pub http_timeout_secs: u64,
    pub fallback_language: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let database_path = read(TRELLIS_DATABASE_PATH)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(trellis_core::constants::database_file);

        let db_max_connections = match read(TRELLIS_DB_MAX_CONNECTIONS) {
            Some(v) => v
                .parse::<u32>()
                .map_err(|source| ConfigError::InvalidNumber {
                    key: TRELLIS_DB_MAX_CONNECTIONS,
                    source,
                })?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        if db_max_connections == 0 {
            return Err(ConfigError::Zero(TRELLIS_DB_MAX_CONNECTIONS));
        }

        let http_timeout_secs = match read(TRELLIS_HTTP_TIMEOUT_SECS) {
            Some(v) => v
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidNumber {
                    key: TRELLIS_HTTP_TIMEOUT_SECS,
                    source,
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(ConfigError::Zero(TRELLIS_HTTP_TIMEOUT_SECS));
        }

        let url = |key: &'static str, default: &str| -> Result<String, ConfigError> {
            match read(key) {
                Some(v) if v.is_empty() => Err(ConfigError::Empty(key)),
                Some(v) => Ok(v.trim_end_matches('/').to_string()),
                None => Ok(default.to_string()),
            }
        };

        Ok(Config {
            database_path,
            db_max_connections,
            legacy_gateway_url: url(TRELLIS_LEGACY_GATEWAY_URL, DEFAULT_LEGACY_GATEWAY_URL)?,
            statistics_url: url(TRELLIS_STATISTICS_URL, DEFAULT_STATISTICS_URL)?,
            permission_url: url(TRELLIS_PERMISSION_URL, DEFAULT_PERMISSION_URL)?,
            http_timeout_secs,
            fallback_language: read(TRELLIS_FALLBACK_LANGUAGE)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FALLBACK_LANGUAGE.to_string()),
            log_filter: read(TRELLIS_LOG)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

/// Install the global fmt subscriber; `RUST_LOG` takes precedence over
/// [`Config::log_filter`]
pub fn init_tracing(config: &Config) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| ConfigError::InvalidLogFilter(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| ConfigError::TracingInit(e.to_string()))
}
