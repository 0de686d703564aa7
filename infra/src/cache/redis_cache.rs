//! Redis implementation of core's `ExpiringCache`

use async_trait::async_trait;
use lc_core::errors::{DomainError, DomainResult};
use lc_core::services::cache::ExpiringCache;

use super::redis_client::RedisClient;

/// Expiring cache over a shared Redis connection; expiry is enforced by Redis
#[derive(Clone)]
pub struct RedisExpiringCache {
    client: RedisClient,
}

impl RedisExpiringCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl ExpiringCache for RedisExpiringCache {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()> {
        self.client
            .set_with_expiry(key, value, ttl_seconds)
            .await
            .map_err(DomainError::from)
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.client.get(key).await.map_err(DomainError::from)
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        self.client.exists(key).await.map_err(DomainError::from)
    }

    async fn delete(&self, key: &str) -> DomainResult<bool> {
        self.client.delete(key).await.map_err(DomainError::from)
    }
}
