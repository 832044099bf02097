//! Client configuration.

use std::fmt;
use std::time::Duration;

use alphav_core::{DataError, Result};

/// Query endpoint of the Alpha Vantage API.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AV_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "AV_BASE_URL";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`AlphaVantageProvider`](crate::AlphaVantageProvider).
///
/// The API key is never printed by `Debug`.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    min_request_interval: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("min_request_interval", &self.min_request_interval)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for `api_key` with default settings.
    ///
    /// Returns [`DataError::MissingApiKey`] if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(DataError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_request_interval: Duration::ZERO,
        })
    }

    /// Reads the API key from `AV_API_KEY` and, if set, the base URL from
    /// `AV_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| DataError::MissingApiKey)?;
        let config = Self::new(api_key)?;
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(config.with_base_url(url.trim())),
            _ => Ok(config),
        }
    }

    /// Overrides the query endpoint (for proxies and test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the minimum spacing between consecutive requests.
    #[must_use]
    pub const fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the query endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the minimum spacing between requests.
    #[must_use]
    pub const fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("demo").unwrap();
        assert_eq!(config.api_key(), "demo");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.min_request_interval(), Duration::ZERO);
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(matches!(ClientConfig::new(""), Err(DataError::MissingApiKey)));
        assert!(matches!(ClientConfig::new("  "), Err(DataError::MissingApiKey)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("secret_key_12345").unwrap();
        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_base_url("http://localhost:8080/query")
            .with_timeout(Duration::from_secs(5))
            .with_min_request_interval(Duration::from_millis(800));
        assert_eq!(config.base_url(), "http://localhost:8080/query");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.min_request_interval(), Duration::from_millis(800));
    }
}
