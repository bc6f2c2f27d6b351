//! Configuration for the geocoding client
//!
//! Settings come from the `[geocoder]` config section, optionally overridden
//! by environment variables.

use crate::error::{ApiError, ApiResult};
use clinicfinder_core::config::GeocoderConfig;
use clinicfinder_core::rate_limit::RateLimitConfig;
use clinicfinder_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Public Nominatim instance
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Geocoder base URL override
pub const ENV_GEOCODER_URL: &str = "CLINICFINDER_GEOCODER_URL";
/// User-Agent override
pub const ENV_USER_AGENT: &str = "CLINICFINDER_USER_AGENT";
/// Deployment environment
pub const ENV_ENVIRONMENT: &str = "CLINICFINDER_ENV";
/// Request timeout override in seconds
pub const ENV_TIMEOUT_SECS: &str = "CLINICFINDER_TIMEOUT_SECS";

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development, typically a self-hosted geocoder
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse a name; anything unrecognized is production
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Read `CLINICFINDER_ENV`
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&env::var(ENV_ENVIRONMENT).unwrap_or_default())
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Geocoder base URL (Nominatim-compatible)
    pub base_url: String,
    /// Identifying User-Agent sent with every request
    pub user_agent: String,
    /// Comma separated ISO country codes; empty searches worldwide
    pub country_codes: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(&GeocoderConfig::default(), Environment::Production)
    }
}

impl ClientConfig {
    /// Configuration from environment variables over defaults
    ///
    /// Reads:
    /// - `CLINICFINDER_GEOCODER_URL`: geocoder base URL
    /// - `CLINICFINDER_USER_AGENT`: identifying User-Agent
    /// - `CLINICFINDER_ENV`: environment (development/staging/production)
    /// - `CLINICFINDER_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::from_settings(&GeocoderConfig::default())
    }

    /// Configuration from the `[geocoder]` section, with environment overrides
    pub fn from_settings(settings: &GeocoderConfig) -> ApiResult<Self> {
        let config = Self::for_environment(settings, Environment::from_env())
            .with_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Configuration for an explicit environment, no environment variables
    #[must_use]
    pub fn for_environment(settings: &GeocoderConfig, environment: Environment) -> Self {
        let (retry, rate_limit) = match environment {
            // Self-hosted geocoders have no usage policy to respect
            Environment::Development => (RetryConfig::quick(), RateLimitConfig::unlimited()),
            Environment::Staging | Environment::Production => {
                (RetryConfig::default(), RateLimitConfig::per_second(1))
            }
        };

        Self {
            base_url: settings.base_url.clone(),
            user_agent: settings.user_agent.clone(),
            country_codes: settings.country_codes.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            retry,
            rate_limit,
            environment,
        }
    }

    /// Apply `CLINICFINDER_*` overrides from `lookup`
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_GEOCODER_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            self.user_agent = agent.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|s| s.trim().parse().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Local geocoder with fast retries and no rate limit
    #[must_use]
    pub fn development(base_url: impl Into<String>) -> Self {
        Self::for_environment(&GeocoderConfig::default(), Environment::Development).with_base_url(base_url)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the User-Agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_GEOCODER_URL);
        assert!(config.user_agent.starts_with("clinicfinder/"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.rate_limit.max_requests, 1);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse(" Staging "), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Production);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default().with_overrides(|key| match key {
            ENV_GEOCODER_URL => Some("http://localhost:8088".to_string()),
            ENV_USER_AGENT => Some("  ".to_string()),
            ENV_TIMEOUT_SECS => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:8088");
        assert!(config.user_agent.starts_with("clinicfinder/"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_development_config() {
        let config = ClientConfig::development("http://localhost:8088");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.retry.max_attempts, RetryConfig::quick().max_attempts);
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_user_agent("").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
    }
}
