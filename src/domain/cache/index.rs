//! Registry of cache keys written per namespace

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::key::CacheNamespace;
use crate::domain::DomainError;

/// Keys tracked per namespace before the index gives up on that namespace
pub const DEFAULT_MAX_TRACKED_KEYS: usize = 1024;

#[derive(Debug, Default)]
struct TrackedKeys {
    keys: HashMap<String, Instant>,
    /// Set once the namespace outgrew the cap; cleared by `drain`
    overflowed: bool,
}

/// Result of draining a namespace
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainedKeys {
    pub keys: Vec<String>,
    /// Keys were dropped from tracking; the caller must remove the whole namespace
    pub overflowed: bool,
}

/// Tracks which keys were populated so writes can invalidate them directly
///
/// Each namespace holds at most `max_keys` entries. Entries older than the
/// cache TTL are pruned first; if the namespace is still over the cap it
/// stops tracking individual keys and is reported as overflowed on the next
/// drain.
#[derive(Debug)]
pub struct CacheKeyIndex {
    namespaces: RwLock<HashMap<CacheNamespace, TrackedKeys>>,
    max_keys: usize,
    ttl: Duration,
}

impl Default for CacheKeyIndex {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_TRACKED_KEYS, Duration::from_secs(3600))
    }
}

impl CacheKeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_keys: usize, ttl: Duration) -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
            max_keys,
            ttl,
        }
    }

    /// Records a key under a namespace
    pub fn record(
        &self,
        namespace: CacheNamespace,
        key: impl Into<String>,
    ) -> Result<(), DomainError> {
        let mut namespaces = self.namespaces.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let tracked = namespaces.entry(namespace).or_default();
        if tracked.overflowed {
            return Ok(());
        }

        tracked.keys.insert(key.into(), Instant::now());

        if tracked.keys.len() > self.max_keys {
            let ttl = self.ttl;
            tracked.keys.retain(|_, recorded_at| recorded_at.elapsed() < ttl);

            if tracked.keys.len() > self.max_keys {
                tracked.keys = HashMap::new();
                tracked.overflowed = true;
            }
        }

        Ok(())
    }

    /// Removes and returns every key recorded under a namespace
    pub fn drain(&self, namespace: CacheNamespace) -> Result<DrainedKeys, DomainError> {
        let mut namespaces = self.namespaces.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(tracked) = namespaces.remove(&namespace) else {
            return Ok(DrainedKeys::default());
        };

        let mut keys: Vec<String> = tracked.keys.into_keys().collect();
        keys.sort();

        Ok(DrainedKeys {
            keys,
            overflowed: tracked.overflowed,
        })
    }

    /// Keys currently recorded under a namespace, sorted
    pub fn keys(&self, namespace: CacheNamespace) -> Result<Vec<String>, DomainError> {
        let namespaces = self.namespaces.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut keys: Vec<String> = namespaces
            .get(&namespace)
            .map(|tracked| tracked.keys.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();

        Ok(keys)
    }

    /// Forgets every namespace
    pub fn clear(&self) -> Result<(), DomainError> {
        let mut namespaces = self.namespaces.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        namespaces.clear();
        Ok(())
    }
}
