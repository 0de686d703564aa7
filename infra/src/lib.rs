//! # Infrastructure Layer
//!
//! Concrete implementations of the seams defined in `lc_core`:
//!
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis-backed expiring cache for OTP codes, rate markers and
//!   OAuth polling records
//! - **SMS**: per-country routing over Twilio, AWS SNS and a log transport
//! - **Identity**: LINE, Facebook and Google token verification and OAuth
//!   code exchange over HTTP
//!
//! ## Features
//!
//! - `mysql`: MySQL repositories (default)
//! - `redis-cache`: Redis cache (default)
//! - `twilio-sms`: Twilio transport (default)
//! - `aws-sns`: AWS SNS transport (default)

use lc_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and the expiring cache built on it
pub mod cache;

/// SMS transports and the country router
pub mod sms;

/// HTTP identity providers for social login
pub mod identity;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Http(e) => DomainError::upstream("http", e.to_string()),
            InfrastructureError::Sms(message) => DomainError::upstream("sms", message),
            other => DomainError::internal(other.to_string()),
        }
    }
}
