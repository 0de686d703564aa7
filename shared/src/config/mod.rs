//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and token lifetimes
//! - `cache` - Redis connection settings
//! - `database` - MySQL connection pool settings
//! - `environment` - Environment detection, storage backend and logging
//! - `server` - HTTP server and CORS settings
//! - `sms` - SMS transport credentials and per-country routing
//! - `social` - OAuth client credentials for LINE, Facebook and Google

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod server;
pub mod sms;
pub mod social;

use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig, StorageBackend};
pub use server::{CorsConfig, ServerConfig};
pub use sms::{AwsSnsSettings, SmsConfig, SmsProviderKind, TwilioSettings};
pub use social::{OAuthClientConfig, SocialConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub environment: Environment,
    pub storage: StorageBackend,
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub jwt: JwtConfig,
    pub sms: SmsConfig,
    pub social: SocialConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            storage: StorageBackend::from_env(),
            server: ServerConfig::from_env(),
            cors: CorsConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            jwt: JwtConfig::from_env(),
            sms: SmsConfig::from_env(),
            social: SocialConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Collect configuration problems that must block startup
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            errors.push("JWT_SECRET must be set in production".to_string());
        }
        if self.jwt.secret.len() < 16 {
            errors.push("JWT_SECRET must be at least 16 characters".to_string());
        }
        if self.jwt.access_token_expire_minutes <= 0 {
            errors.push("ACCESS_TOKEN_EXPIRE_MINUTES must be positive".to_string());
        }
        if self.jwt.refresh_token_expire_days <= 0 {
            errors.push("REFRESH_TOKEN_EXPIRE_DAYS must be positive".to_string());
        }
        if self.server.port == 0 {
            errors.push("SERVER_PORT must not be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read an optional, non-empty environment variable
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
