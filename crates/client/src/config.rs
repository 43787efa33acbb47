//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Backend base URL (default: `http://localhost:5000/api`)
//! - `SHOPFRONT_DATA_DIR` - Local storage directory (default: platform data dir + `shopfront`)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Catalogue cache TTL in seconds (default: 300)
//! - `SHOPFRONT_ENFORCE_STATUS_FLOW` - Reject illegal order status moves locally (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::orders::TransitionPolicy;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default catalogue cache TTL.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are appended to it
    pub api_url: Url,
    /// Directory holding `storage.json`
    pub data_dir: PathBuf,
    /// How long the product catalogue stays cached
    pub cache_ttl: Duration,
    /// Whether order status changes are checked before sending
    pub transition_policy: TransitionPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults for everything except the backend URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not a valid
    /// absolute URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            data_dir: default_data_dir(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            transition_policy: TransitionPolicy::default(),
            sentry_dsn: None,
        })
    }

    /// Use a specific storage directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&get_or_default(&lookup, "SHOPFRONT_API_URL", DEFAULT_API_URL))?;

        let data_dir = lookup("SHOPFRONT_DATA_DIR").map_or_else(default_data_dir, PathBuf::from);

        let cache_ttl = get_or_default(
            &lookup,
            "SHOPFRONT_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_CACHE_TTL_SECS".to_string(), e.to_string()))?;

        let enforce = parse_bool(&get_or_default(&lookup, "SHOPFRONT_ENFORCE_STATUS_FLOW", "true"))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SHOPFRONT_ENFORCE_STATUS_FLOW".to_string(),
                    "expected true or false".to_string(),
                )
            })?;
        let transition_policy = if enforce {
            TransitionPolicy::Enforce
        } else {
            TransitionPolicy::Delegate
        };

        Ok(Self {
            api_url,
            data_dir,
            cache_ttl,
            transition_policy,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_API_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Platform data directory, falling back to the home directory and then the
/// working directory.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shopfront")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.transition_policy, TransitionPolicy::Enforce);
        assert!(config.data_dir.ends_with("shopfront"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPFRONT_API_URL", "https://shop.example.com/api"),
            ("SHOPFRONT_DATA_DIR", "/tmp/shop"),
            ("SHOPFRONT_CACHE_TTL_SECS", "5"),
            ("SHOPFRONT_ENFORCE_STATUS_FLOW", "false"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("shop.example.com"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.transition_policy, TransitionPolicy::Delegate);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("SHOPFRONT_CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_CACHE_TTL_SECS"));

        let err = load(&[("SHOPFRONT_ENFORCE_STATUS_FLOW", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = load(&[("SHOPFRONT_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_API_URL"));
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
