//! Cache module for Redis-based caching
//!
//! Provides the Redis client and the `ExpiringCache` implementation used for
//! verification codes, resend markers and OAuth polling records.

pub mod redis_cache;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use redis_cache::RedisExpiringCache;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use lc_shared::config::CacheConfig;
