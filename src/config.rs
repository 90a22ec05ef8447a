//! Server configuration module
//! Handles configuration parameters read from the environment

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{ApiError, Result};
use std::env;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Credentials for the provisioned administrator account, if any.
    /// The admin role is only reachable through this path.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl ServerConfig {
    /// Create a test configuration - only for tests, never production
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-test-signing-key-abcdefghijklmnop".to_string(),
            admin_email: None,
            admin_password: None,
        }
    }

    /// Validate that the JWT secret meets minimum security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(ApiError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Reject obvious placeholder values
        let insecure_patterns = ["your_jwt_secret", "change-this", "password", "12345"];
        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(ApiError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("FUNDLINK_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("FUNDLINK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("FUNDLINK_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                ApiError::ConfigError(
                    "JWT_SECRET environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        Self::validate_jwt_secret(&jwt_secret)?;

        let admin_email = env::var("ADMIN_EMAIL").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        if admin_email.is_some() != admin_password.is_some() {
            return Err(ApiError::ConfigError(
                "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            admin_email,
            admin_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = ServerConfig::validate_jwt_secret("short");
        assert!(result.is_err());
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        let result =
            ServerConfig::validate_jwt_secret("your_jwt_secret-padded-to-32-characters!!");
        assert!(result.is_err());
    }

    #[test]
    fn test_digit_run_secret_rejected() {
        // "12345" is matched anywhere, including inside a longer run
        let result =
            ServerConfig::validate_jwt_secret("signing-key-0123456789-padded-to-32-chars");
        assert!(result.is_err());
    }

    #[test]
    fn test_for_testing_secret_is_accepted() {
        let config = ServerConfig::for_testing();
        assert!(ServerConfig::validate_jwt_secret(&config.jwt_secret).is_ok());
    }
}
