//! Integration tests for the Redis-backed expiring cache
//!
//! These tests require a running Redis instance.
//! Run with: cargo test -p lc_infra --test redis_integration -- --ignored

use lc_core::services::cache::ExpiringCache;
use lc_infra::cache::{CacheConfig, RedisClient, RedisExpiringCache};

fn config() -> CacheConfig {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    CacheConfig {
        key_prefix: Some("lc_test:".to_string()),
        ..CacheConfig::new(url)
    }
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let client = RedisClient::new(config()).await;
    assert!(client.is_ok(), "Failed to connect to Redis");
    assert!(client.unwrap().health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_verification_code_round_trip() {
    let cache = RedisExpiringCache::new(RedisClient::new(config()).await.unwrap());
    let key = "phone_verification:+886912345678";

    cache.set_with_expiry(key, "482913", 600).await.unwrap();
    assert_eq!(cache.get(key).await.unwrap().as_deref(), Some("482913"));

    let ttl = cache.client().ttl(key).await.unwrap().unwrap();
    assert!(ttl > 590 && ttl <= 600);

    cache.delete(key).await.unwrap();
    assert!(!cache.exists(key).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_expiry() {
    let cache = RedisExpiringCache::new(RedisClient::new(config()).await.unwrap());
    let key = "phone_code_rate:+66812345678";

    cache.set_with_expiry(key, "1", 1).await.unwrap();
    assert!(cache.exists(key).await.unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert!(cache.get(key).await.unwrap().is_none());
}
