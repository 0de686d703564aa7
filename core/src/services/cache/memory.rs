use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::errors::DomainResult;
use crate::services::clock::{Clock, SystemClock};

use super::ExpiringCache;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Process-local cache with clock-driven expiry
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpiringCache for InMemoryCache {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()> {
        let now = self.clock.now();
        let expires_at = now + Duration::seconds(ttl_seconds as i64);
        let mut entries = self.entries.write().await;
        // expired entries are dropped on every write
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete(&self, key: &str) -> DomainResult<bool> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(key)
            .map(|entry| entry.expires_at > now)
            .unwrap_or(false))
    }
}
