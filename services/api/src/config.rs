//! services/api/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
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
    /// JSON catalog to serve instead of the built-in one.
    pub documents_path: Option<PathBuf>,
    /// Fixed latency of the simulated mail dispatcher.
    pub send_delay: Duration,
    /// Origin of the rendering front end, for CORS.
    pub allowed_origin: HeaderValue,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin_str =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());
        let allowed_origin = allowed_origin_str.parse::<HeaderValue>().map_err(|e| {
            ConfigError::InvalidValue("ALLOWED_ORIGIN".to_string(), e.to_string())
        })?;

        // --- Library Settings ---
        let documents_path = lookup("DOCUMENTS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let send_delay = match lookup("SEND_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                ConfigError::InvalidValue(
                    "SEND_DELAY_MS".to_string(),
                    format!("'{}' is not a number of milliseconds", raw),
                )
            })?,
            None => Duration::from_millis(1500),
        };

        Ok(Self {
            bind_address,
            log_level,
            documents_path,
            send_delay,
            allowed_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.documents_path, None);
        assert_eq!(config.send_delay, Duration::from_millis(1500));
        assert_eq!(config.allowed_origin, "http://localhost:5173");
    }

    #[test]
    fn explicit_values_are_used() {
        let config = config_from(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("DOCUMENTS_PATH", "./catalog.json"),
            ("SEND_DELAY_MS", "250"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.documents_path, Some(PathBuf::from("./catalog.json")));
        assert_eq!(config.send_delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_delay_is_rejected() {
        match config_from(&[("SEND_DELAY_MS", "soon")]) {
            Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, "SEND_DELAY_MS"),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        assert!(matches!(
            config_from(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(_, _))
        ));
    }
}
