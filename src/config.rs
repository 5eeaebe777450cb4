//! Server configuration module
//! Handles configuration parameters for the authentication service

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REFRESH_TOKEN_TTL_DAYS,
};
use crate::error::{Result, RustyGateError};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for access token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued access tokens
    pub access_token_ttl: Duration,
    /// Lifetime of issued refresh tokens (applied at the delivery layer)
    pub refresh_token_ttl: Duration,
    /// Development mode (relaxes operational warnings only, never security checks)
    pub development_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "test-jwt-secret-only-for-unit-tests-never-use-in-production".to_string(),
            access_token_ttl: Duration::from_secs(DEFAULT_ACCESS_TOKEN_TTL_MINUTES * 60),
            refresh_token_ttl: Duration::from_secs(DEFAULT_REFRESH_TOKEN_TTL_DAYS * 86400),
            development_mode: true,
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(RustyGateError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "INSECURE-DEFAULT-FOR-TESTING-ONLY",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(RustyGateError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyGateError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("RUSTY_GATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("RUSTY_GATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("RUSTY_GATE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                RustyGateError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let access_ttl_minutes = env::var("RUSTY_GATE_ACCESS_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_MINUTES);

        let refresh_ttl_days = env::var("RUSTY_GATE_REFRESH_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_DAYS);

        if access_ttl_minutes == 0 || refresh_ttl_days == 0 {
            return Err(RustyGateError::ConfigError(
                "Token lifetimes must be greater than zero".to_string(),
            ));
        }

        let development_mode = env::var("RUSTY_GATE_DEVELOPMENT_MODE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false); // SECURITY: Default to false (production mode)

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            access_token_ttl: Duration::from_secs(access_ttl_minutes * 60),
            refresh_token_ttl: Duration::from_secs(refresh_ttl_days * 86400),
            development_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ServerConfig::default() is not allowed for security reasons")]
    fn test_default_panics() {
        let _ = ServerConfig::default();
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.jwt_secret.contains("test"));
        assert!(config.development_mode);
        assert_eq!(config.access_token_ttl, Duration::from_secs(15 * 60));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(7 * 86400));
    }

    #[test]
    fn test_from_env_requires_secret() {
        // Clear any existing env vars
        env::remove_var("RUSTY_GATE_JWT_SECRET");
        env::remove_var("JWT_SECRET");

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_weak_secret_rejected() {
        let result = ServerConfig::validate_jwt_secret("short");
        assert!(result.is_err());

        let result = ServerConfig::validate_jwt_secret("your-secret-key-your-secret-key-123");
        assert!(result.is_err());
    }
}
