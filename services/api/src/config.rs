//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub request_timeout: Duration,
    pub allowed_origin: String,
}

/// Reads a variable, treating an empty or whitespace-only value as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

        let allowed_origin = non_empty_var("ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:9002".to_string());

        // --- Load Provider Settings ---
        let gemini_api_key = non_empty_var("GEMINI_API_KEY")
            .or_else(|| non_empty_var("GOOGLE_API_KEY"))
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;

        let gemini_api_base = non_empty_var("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        let timeout_str =
            std::env::var("REQUEST_TIMEOUT_SECS").unwrap_or_else(|_| "90".to_string());
        let request_timeout = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            gemini_api_base,
            request_timeout,
            allowed_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        for name in [
            "BIND_ADDRESS",
            "RUST_LOG",
            "GEMINI_API_KEY",
            "GOOGLE_API_KEY",
            "GEMINI_API_BASE",
            "REQUEST_TIMEOUT_SECS",
            "ALLOWED_ORIGIN",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing the environment variable TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for the environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "test-gemini-key");

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.gemini_api_key, "test-gemini-key");
        assert_eq!(config.gemini_api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.allowed_origin, "http://localhost:9002");
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
        env::set_var("RUST_LOG", "debug");
        env::set_var("GOOGLE_API_KEY", "google-key");
        env::set_var("GEMINI_API_BASE", "http://localhost:9999/v1beta/");
        env::set_var("REQUEST_TIMEOUT_SECS", "15");
        env::set_var("ALLOWED_ORIGIN", "https://tutor.example");

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.gemini_api_key, "google-key");
        assert_eq!(config.gemini_api_base, "http://localhost:9999/v1beta");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.allowed_origin, "https://tutor.example");
    }

    #[test]
    #[serial]
    fn test_config_missing_api_key() {
        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "   ");

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "GEMINI_API_KEY"),
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_values() {
        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "k");
        env::set_var("BIND_ADDRESS", "not-a-valid-address");
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }

        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "k");
        env::set_var("RUST_LOG", "not-a-level");
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }

        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "k");
        env::set_var("REQUEST_TIMEOUT_SECS", "0");
        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "REQUEST_TIMEOUT_SECS"),
            _ => panic!("Expected InvalidValue for REQUEST_TIMEOUT_SECS"),
        }
    }
}
