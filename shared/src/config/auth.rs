//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,

    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expire_days: i64,

    /// `iss` claim written into and required from every token
    pub issuer: String,

    /// `aud` claim written into and required from every token
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            issuer: String::from("live-commerce"),
            audience: String::from("live-commerce-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expire_minutes: env_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                defaults.access_token_expire_minutes,
            ),
            refresh_token_expire_days: env_or(
                "REFRESH_TOKEN_EXPIRE_DAYS",
                defaults.refresh_token_expire_days,
            ),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expire_days = days;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}
