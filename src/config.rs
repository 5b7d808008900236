//! Configuration Module
//!
//! Loads cache and server settings from environment variables.

use std::env;
use std::time::Duration;

/// Cache and server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Expiry TTL in milliseconds; `None` disables expiry entirely
    pub ttl_ms: Option<u64>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: unset, no expiry)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Returns the configured TTL as a `Duration`, if expiry is enabled.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: None,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ttl_ms, None);
        assert_eq!(config.server_port, 3000);
        assert!(config.ttl().is_none());
    }

    #[test]
    fn test_config_ttl_conversion() {
        let config = Config {
            ttl_ms: Some(1500),
            ..Config::default()
        };
        assert_eq!(config.ttl(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("CACHE_TTL_MS");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.ttl_ms, None);
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_TTL_MS", "250");
        env::set_var("SERVER_PORT", "8080");
        let config = Config::from_env();
        assert_eq!(config.ttl_ms, Some(250));
        assert_eq!(config.server_port, 8080);

        env::set_var("CACHE_TTL_MS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.ttl_ms, None);

        env::remove_var("CACHE_TTL_MS");
        env::remove_var("SERVER_PORT");
    }
}
