//! Read-through cache for paginated listings

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::cache::{
    Cache, CacheExt, CacheKeyIndex, CacheNamespace, DEFAULT_MAX_TRACKED_KEYS,
};

/// Configuration for listing caching
#[derive(Debug, Clone)]
pub struct ListCacheConfig {
    /// Lifetime of every cached page
    pub default_ttl: Duration,
    /// Keys tracked per namespace before invalidation falls back to a pattern delete
    pub max_tracked_keys: usize,
}

impl Default for ListCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(3600), // 1 hour
            max_tracked_keys: DEFAULT_MAX_TRACKED_KEYS,
        }
    }
}

impl ListCacheConfig {
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_max_tracked_keys(mut self, max_keys: usize) -> Self {
        self.max_tracked_keys = max_keys;
        self
    }
}

/// Cache of listing pages with namespace-wide invalidation
///
/// Backend failures never fail the request: a failed read is a miss and a
/// failed write or invalidation is logged.
#[derive(Debug, Clone)]
pub struct ListCache {
    cache: Arc<dyn Cache>,
    index: Arc<CacheKeyIndex>,
    config: ListCacheConfig,
}

impl ListCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_config(cache, ListCacheConfig::default())
    }

    pub fn with_config(cache: Arc<dyn Cache>, config: ListCacheConfig) -> Self {
        Self {
            cache,
            index: Arc::new(CacheKeyIndex::with_limits(
                config.max_tracked_keys,
                config.default_ttl,
            )),
            config,
        }
    }

    /// Cached page for a key, if any
    pub async fn get<V>(&self, key: &str) -> Option<V>
    where
        V: DeserializeOwned + Send,
    {
        match self.cache.get::<V>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Stores a page and records its key under the namespace
    pub async fn put<V>(&self, namespace: CacheNamespace, key: &str, value: &V)
    where
        V: Serialize + Send + Sync,
    {
        if let Err(e) = self.cache.set(key, value, self.config.default_ttl).await {
            warn!(key = %key, error = %e, "Failed to populate cache");
            return;
        }

        // recorded after the write so the index covers everything stored
        if let Err(e) = self.index.record(namespace, key) {
            warn!(key = %key, error = %e, "Failed to record cache key");
        }
    }

    /// Removes every page recorded under a namespace
    ///
    /// A namespace that outgrew the index is removed by pattern instead.
    pub async fn invalidate(&self, namespace: CacheNamespace) {
        let drained = match self.index.drain(namespace) {
            Ok(drained) => drained,
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "Failed to drain cache key index");
                return;
            }
        };

        if drained.overflowed {
            match self.cache.delete_pattern(&namespace.pattern()).await {
                Ok(removed) => {
                    debug!(namespace = %namespace, removed, "Invalidated untracked cached pages")
                }
                Err(e) => warn!(
                    namespace = %namespace,
                    error = %e,
                    "Failed to invalidate cache namespace"
                ),
            }
        }

        let keys = drained.keys;
        for key in &keys {
            if let Err(e) = self.cache.delete(key).await {
                warn!(key = %key, error = %e, "Failed to invalidate cache key");
            }
        }

        debug!(namespace = %namespace, removed = keys.len(), "Invalidated cached pages");
    }

    /// Removes a single key outside any namespace
    pub async fn invalidate_key(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key = %key, error = %e, "Failed to invalidate cache key");
        }
    }

    /// Deletes every backend key of a namespace, recorded or not
    ///
    /// Used at startup, when a shared backend may still hold pages written
    /// by a previous process.
    pub async fn purge(&self, namespace: CacheNamespace) -> usize {
        if let Err(e) = self.index.drain(namespace) {
            warn!(namespace = %namespace, error = %e, "Failed to drain cache key index");
        }

        match self.cache.delete_pattern(&namespace.pattern()).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "Failed to purge cache namespace");
                0
            }
        }
    }

    /// Keys currently tracked for a namespace
    pub fn tracked_keys(&self, namespace: CacheNamespace) -> Vec<String> {
        self.index.keys(namespace).unwrap_or_default()
    }

    pub fn backend(&self) -> &Arc<dyn Cache> {
        &self.cache
    }
}

/// Cache double that checks the store is free whenever a page is written
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::domain::cache::Cache;
    use crate::domain::store::Store;
    use crate::domain::DomainError;

    #[derive(Debug)]
    pub struct SessionCheckingCache {
        store: Arc<dyn Store>,
        writes: AtomicUsize,
        blocked_writes: AtomicUsize,
    }

    impl SessionCheckingCache {
        pub fn new(store: Arc<dyn Store>) -> Self {
            Self {
                store,
                writes: AtomicUsize::new(0),
                blocked_writes: AtomicUsize::new(0),
            }
        }

        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Writes that happened while a store session was still open
        pub fn blocked_writes(&self) -> usize {
            self.blocked_writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Cache for SessionCheckingCache {
        async fn get_raw(&self, _key: &str) -> Result<Option<String>, DomainError> {
            Ok(None)
        }

        async fn set_raw(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), DomainError> {
            self.writes.fetch_add(1, Ordering::SeqCst);

            let session =
                tokio::time::timeout(Duration::from_millis(200), self.store.session()).await;
            if session.is_err() {
                self.blocked_writes.fetch_add(1, Ordering::SeqCst);
            }

            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn delete_pattern(&self, _pattern: &str) -> Result<usize, DomainError> {
            Ok(0)
        }

        async fn clear(&self) -> Result<(), DomainError> {
            Ok(())
        }

        async fn size(&self) -> Result<usize, DomainError> {
            Ok(0)
        }
    }
}
