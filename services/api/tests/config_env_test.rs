//! Config environment variable tests
//!
//! `Config::from_env()` reads process-wide environment variables, so every
//! test runs under `#[serial]` and restores what it changed.

use api_lib::config::{Config, ConfigError};
use serial_test::serial;
use std::env;
use std::time::Duration;

const VARS: [&str; 6] = [
    "BIND_ADDRESS",
    "RUST_LOG",
    "SESSION_TTL_MINUTES",
    "SESSION_SWEEP_SECS",
    "TIMER_TICK_MS",
    "CORS_ORIGIN",
];

fn clear_vars() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_defaults() {
    clear_vars();
    let config = Config::from_env().unwrap();
    let defaults = Config::default();

    assert_eq!(config.bind_address, defaults.bind_address);
    assert_eq!(config.log_level, tracing::Level::INFO);
    assert_eq!(config.session_ttl, Duration::from_secs(3600));
    assert_eq!(config.session_sweep_interval, Duration::from_secs(60));
    assert_eq!(config.timer_tick, Duration::from_millis(1000));
    assert_eq!(config.cors_origin, "http://localhost:3000");
}

#[test]
#[serial]
fn test_config_overrides() {
    clear_vars();
    env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
    env::set_var("RUST_LOG", "debug");
    env::set_var("SESSION_TTL_MINUTES", "15");
    env::set_var("TIMER_TICK_MS", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.bind_address.port(), 8080);
    assert_eq!(config.log_level, tracing::Level::DEBUG);
    assert_eq!(config.session_ttl, Duration::from_secs(15 * 60));
    assert_eq!(config.timer_tick, Duration::ZERO);

    clear_vars();
}

#[test]
#[serial]
fn test_config_rejects_zero_ttl() {
    clear_vars();
    env::set_var("SESSION_TTL_MINUTES", "0");

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "SESSION_TTL_MINUTES"));

    clear_vars();
}

#[test]
#[serial]
fn test_config_rejects_bad_values() {
    clear_vars();
    env::set_var("TIMER_TICK_MS", "soon");
    assert!(Config::from_env().is_err());

    clear_vars();
    env::set_var("BIND_ADDRESS", "not-an-address");
    assert!(Config::from_env().is_err());

    clear_vars();
    env::set_var("RUST_LOG", "loud");
    assert!(Config::from_env().is_err());

    clear_vars();
}
