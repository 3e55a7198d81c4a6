//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Idle time after which a session and its records are discarded.
    pub session_ttl: Duration,
    /// How often expired sessions are swept.
    pub session_sweep_interval: Duration,
    /// Length of one countdown tick for the mindfulness timers.
    pub timer_tick: Duration,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            session_ttl: Duration::from_secs(60 * 60),
            session_sweep_interval: Duration::from_secs(60),
            timer_tick: Duration::from_millis(1000),
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load Session and Timer Settings ---
        let session_ttl_minutes = positive_u64("SESSION_TTL_MINUTES", 60)?;
        let sweep_secs = positive_u64("SESSION_SWEEP_SECS", 60)?;
        let timer_tick_ms = parse_u64("TIMER_TICK_MS", 1000)?;

        Ok(Self {
            bind_address,
            log_level,
            session_ttl: Duration::from_secs(session_ttl_minutes * 60),
            session_sweep_interval: Duration::from_secs(sweep_secs),
            timer_tick: Duration::from_millis(timer_tick_ms),
            cors_origin,
        })
    }
}

fn parse_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                var.to_string(),
                format!("'{}' is not a non-negative integer", raw),
            )
        }),
        Err(_) => Ok(default),
    }
}

fn positive_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
    match parse_u64(var, default)? {
        0 => Err(ConfigError::InvalidValue(
            var.to_string(),
            "must be greater than zero".to_string(),
        )),
        value => Ok(value),
    }
}
