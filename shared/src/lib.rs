//! Shared utilities and common types for the Live Commerce server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Response structures shared by the API layer
//! - Phone number helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig, ServerConfig,
    SmsConfig, SocialConfig, StorageBackend,
};
pub use types::{ErrorResponse, Language};
pub use utils::phone;
