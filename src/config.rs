//! Server configuration module
//! Handles runtime parameters for the identity service

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_TTL_MIN, DEFAULT_ALLOWED_ORIGIN, DEFAULT_DASHBOARD_URL, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_REFRESH_TOKEN_TTL_MIN,
};
use crate::error::{AllServeError, Result};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Access token time-to-live
    pub access_token_ttl: Duration,
    /// Refresh token time-to-live
    pub refresh_token_ttl: Duration,
    /// The single origin allowed by the CORS layer
    pub allowed_origin: String,
    /// Redirect target after a successful login
    pub dashboard_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            access_token_ttl: Duration::from_secs(DEFAULT_ACCESS_TOKEN_TTL_MIN * 60),
            refresh_token_ttl: Duration::from_secs(DEFAULT_REFRESH_TOKEN_TTL_MIN * 60),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a test configuration
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Both token lifetimes must be strictly positive
    fn validate_ttl(ttl: Duration, kind: &str) -> Result<()> {
        if ttl.is_zero() {
            return Err(AllServeError::ConfigError(format!(
                "{} token TTL must be a strictly positive duration",
                kind
            )));
        }
        Ok(())
    }

    /// Minutes from the environment become a validated duration; values that
    /// overflow the seconds conversion are a configuration error, not a panic.
    fn ttl_from_minutes(minutes: u64, kind: &str) -> Result<Duration> {
        let secs = minutes.checked_mul(60).ok_or_else(|| {
            AllServeError::ConfigError(format!(
                "{} token TTL of {} minutes is out of range",
                kind, minutes
            ))
        })?;
        let ttl = Duration::from_secs(secs);
        Self::validate_ttl(ttl, kind)?;
        Ok(ttl)
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("ALLSERVE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("ALLSERVE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let access_minutes = env::var("ALLSERVE_ACCESS_TOKEN_TTL_MIN")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_MIN);

        let refresh_minutes = env::var("ALLSERVE_REFRESH_TOKEN_TTL_MIN")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_MIN);

        let allowed_origin =
            env::var("ALLSERVE_ALLOWED_ORIGIN").unwrap_or(DEFAULT_ALLOWED_ORIGIN.to_string());

        let dashboard_url =
            env::var("ALLSERVE_DASHBOARD_URL").unwrap_or(DEFAULT_DASHBOARD_URL.to_string());

        let access_token_ttl = Self::ttl_from_minutes(access_minutes, "access")?;
        let refresh_token_ttl = Self::ttl_from_minutes(refresh_minutes, "refresh")?;

        Ok(Self {
            host,
            port,
            access_token_ttl,
            refresh_token_ttl,
            allowed_origin,
            dashboard_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.access_token_ttl, Duration::from_secs(60 * 60));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(90 * 60));
        assert_eq!(config.allowed_origin, "http://localhost:4200");
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = ServerConfig::validate_ttl(Duration::ZERO, "access");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("strictly positive"));
    }

    #[test]
    fn test_overflowing_ttl_minutes_rejected() {
        let result = ServerConfig::ttl_from_minutes(u64::MAX, "access");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("out of range"));
    }

    #[test]
    fn test_ttl_minutes_convert_to_seconds() {
        let ttl = ServerConfig::ttl_from_minutes(60, "access").unwrap();
        assert_eq!(ttl, Duration::from_secs(3600));
    }
}
