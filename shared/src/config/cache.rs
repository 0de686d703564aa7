//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Per-command response timeout in milliseconds
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Maximum retry attempts for a single command
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled on every attempt)
    pub retry_delay_ms: u64,

    /// Optional prefix prepended to every key
    #[serde(default)]
    pub key_prefix: Option<String>,
}

fn default_command_timeout_ms() -> u64 {
    2000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            command_timeout_ms: default_command_timeout_ms(),
            max_retries: 3,
            retry_delay_ms: 100,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            connection_timeout: env_or("REDIS_CONNECTION_TIMEOUT", defaults.connection_timeout),
            command_timeout_ms: env_or("REDIS_COMMAND_TIMEOUT_MS", defaults.command_timeout_ms),
            max_retries: env_or("REDIS_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms),
            key_prefix: super::env_opt("REDIS_KEY_PREFIX"),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Apply the configured prefix to a key
    pub fn prefixed(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keys() {
        let mut config = CacheConfig::default();
        assert_eq!(config.prefixed("phone_verification:+886"), "phone_verification:+886");

        config.key_prefix = Some("lc".to_string());
        assert_eq!(config.prefixed("phone_verification:+886"), "lc:phone_verification:+886");
    }

    #[test]
    fn test_command_timeout_defaults_when_absent() {
        let config: CacheConfig = serde_json::from_value(serde_json::json!({
            "url": "redis://cache:6379",
            "connection_timeout": 5,
            "max_retries": 3,
            "retry_delay_ms": 100
        }))
        .unwrap();
        assert_eq!(config.command_timeout_ms, 2000);
        assert!(config.key_prefix.is_none());
    }
}
