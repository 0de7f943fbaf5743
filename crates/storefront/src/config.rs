//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_DATA_DIR` - Directory for the shopper's local storage (default: .cybrd)
//! - `STOREFRONT_STATIC_DIR` - Product imagery served under `/products`
//!   (default: crates/storefront/static)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Where the cart, wishlist and session are persisted
    pub data_dir: PathBuf,
    /// Product imagery
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
    pub sentry: SentryConfig,
}

/// Sentry settings.
///
/// Implements `Debug` manually to redact the DSN.
#[derive(Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("sample_rate", &self.sample_rate)
            .field("traces_sample_rate", &self.traces_sample_rate)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STOREFRONT_HOST", e))?;
        let port = env
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("STOREFRONT_PORT", e))?;
        let base_url = Url::parse(&env.get_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"))
            .map_err(|e| invalid("STOREFRONT_BASE_URL", e))?;
        let data_dir = PathBuf::from(env.get_or_default("STOREFRONT_DATA_DIR", ".cybrd"));
        let static_dir = PathBuf::from(
            env.get_or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static"),
        );
        let log_format = match env.get_or_default("STOREFRONT_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_LOG_FORMAT".to_string(),
                    format!("expected pretty or json, got {other}"),
                ));
            }
        };

        let sentry = SentryConfig {
            dsn: env.get_optional("SENTRY_DSN").map(SecretString::from),
            environment: env.get_optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: env.get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            static_dir,
            log_format,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for StorefrontConfig {
    /// The configuration with every variable unset.
    fn default() -> Self {
        Self::from_lookup(|_| None).expect("built-in defaults are valid")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), error.to_string())
}

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; empty values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a sampling rate in `0.0..=1.0`.
    fn get_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.get_optional(key) else {
            return Ok(default);
        };
        let rate = raw.trim().parse::<f32>().map_err(|e| invalid(key, e))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(invalid(key, format!("{rate} is outside 0.0..=1.0")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.data_dir, PathBuf::from(".cybrd"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry.dsn.is_none());
        assert!((config.sentry.traces_sample_rate - 0.1).abs() < f32::EPSILON);

        let default = StorefrontConfig::default();
        assert_eq!(default.socket_addr(), config.socket_addr());
        assert_eq!(default.base_url, config.base_url);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/cybrd"),
            ("STOREFRONT_LOG_FORMAT", "json"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("SENTRY_SAMPLE_RATE", "0.5"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/cybrd"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.sentry.dsn.as_ref().unwrap().expose_secret(),
            "https://key@sentry.example/1"
        );
        assert!((config.sentry.sample_rate - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("STOREFRONT_PORT", "http"),
            ("STOREFRONT_HOST", "localhost"),
            ("STOREFRONT_BASE_URL", "not a url"),
            ("STOREFRONT_LOG_FORMAT", "xml"),
            ("SENTRY_TRACES_SAMPLE_RATE", "1.5"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(err.to_string().contains(key), "{err}");
        }
    }

    #[test]
    fn test_sentry_debug_redacts_dsn() {
        let config = load(&[("SENTRY_DSN", "https://super_secret_key@sentry.example/1")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }
}
