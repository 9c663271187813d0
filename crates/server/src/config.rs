//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STATEWISE_HOST` - Bind address (default: 127.0.0.1)
//! - `STATEWISE_PORT` - Listen port (default: 8000)
//! - `STATEWISE_SESSION_TTL_SECS` - Sliding session TTL (default: 900)
//! - `STATEWISE_SWEEP_INTERVAL_SECS` - Expiry sweep period (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Every variable has a default: the service is a self-contained
//! demonstration and must start with no environment at all.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Statewise server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Sliding session TTL in seconds.
    pub session_ttl_secs: i64,
    /// How often the background sweep removes expired sessions, in seconds.
    pub sweep_interval_secs: u64,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            session_ttl_secs: statewise_engine::DEFAULT_SESSION_TTL_SECS,
            sweep_interval_secs: 60,
            sentry_dsn: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a provided variable fails to parse or is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = parse_env("STATEWISE_HOST", defaults.host)?;
        let port = parse_env("STATEWISE_PORT", defaults.port)?;
        let session_ttl_secs = parse_env("STATEWISE_SESSION_TTL_SECS", defaults.session_ttl_secs)?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STATEWISE_SESSION_TTL_SECS".to_owned(),
                format!("must be positive (got {session_ttl_secs})"),
            ));
        }
        let sweep_interval_secs =
            parse_env("STATEWISE_SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs)?;
        if sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STATEWISE_SWEEP_INTERVAL_SECS".to_owned(),
                "must be positive".to_owned(),
            ));
        }
        let sentry_dsn = std::env::var("SENTRY_DSN").ok();

        Ok(Self {
            host,
            port,
            session_ttl_secs,
            sweep_interval_secs,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The session TTL as a `chrono` duration.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }

    /// The sweep period as a std duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.session_ttl_secs, 900);
        assert_eq!(config.sweep_interval_secs, 60);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            ..ServerConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_session_ttl_conversion() {
        let config = ServerConfig {
            session_ttl_secs: 120,
            ..ServerConfig::default()
        };
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(2));
    }

    #[test]
    fn test_sweep_interval_conversion() {
        let config = ServerConfig {
            sweep_interval_secs: 5,
            ..ServerConfig::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
    }
}
