//! Redis cache client
//!
//! One multiplexed connection shared by every clone, with bounded retries and
//! exponential backoff for transient failures. Every command is bounded by
//! the configured response timeout. Keys are passed through the configured
//! prefix before they reach Redis.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use lc_shared::CacheConfig;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

const MAX_BACKOFF_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with connection reuse and retry logic
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the URL and retry settings in `config`
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(&client, &config).await?;
        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    async fn connect_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;
        let timeout = Duration::from_secs(config.connection_timeout);

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match tokio::time::timeout(timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "Redis connection timed out",
                ))),
            };

            match outcome {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < config.max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    fn key(&self, key: &str) -> String {
        self.config.prefixed(key)
    }

    /// SET with EX; a TTL of zero is raised to one second since Redis rejects `EX 0`
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.key(key);
        let value = value.to_string();
        let expiry = expiry_seconds.max(1);
        debug!("Setting key '{}' with expiry {}s", key, expiry);

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.key(key);
        debug!("Getting key '{}'", key);

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Returns whether a key was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        debug!("Deleting key '{}'", key);

        let deleted = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;
        Ok(deleted > 0)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Seconds to live, `None` for a missing key or one without expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key = self.key(key);

        let ttl = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;
        let timeout = Duration::from_millis(self.config.command_timeout_ms);

        loop {
            attempts += 1;
            match bounded(timeout, operation(self.connection.clone())).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Resolve `command` or fail with a retriable timed-out I/O error
pub(crate) async fn bounded<T>(
    timeout: Duration,
    command: impl Future<Output = RedisResult<T>>,
) -> RedisResult<T> {
    match tokio::time::timeout(timeout, command).await {
        Ok(result) => result,
        Err(_) => Err(RedisError::from(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "Redis command timed out",
        ))),
    }
}

/// Transient errors worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
