//! Shared expiring key-value cache used for OTP codes, rate-limit markers and
//! OAuth polling records.

mod memory;

pub use memory::InMemoryCache;

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Per-key atomic operations only; check-then-set across calls is last write wins
#[async_trait]
pub trait ExpiringCache: Send + Sync {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()>;

    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    async fn exists(&self, key: &str) -> DomainResult<bool>;

    /// Returns whether the key was present
    async fn delete(&self, key: &str) -> DomainResult<bool>;
}
