//! In-memory cache implementation using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{glob_to_regex, Cache};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Upper bound on how long any entry is kept
    pub default_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: Duration::from_secs(3600),
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Thread-safe in-memory cache backed by moka
///
/// Each entry carries its own deadline; the moka-level TTL only bounds
/// memory held by entries nobody reads again.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.default_ttl)
            .build();

        Self { cache }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.cache.remove(key).await;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.data)),
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at: Instant::now() + ttl,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self
            .cache
            .remove(key)
            .await
            .is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = glob_to_regex(pattern)?;

        self.cache.run_pending_tasks().await;

        let keys_to_delete: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| regex.is_match(key.as_str()))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let mut deleted = 0;

        for key in keys_to_delete {
            if self.cache.remove(&key).await.is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}
