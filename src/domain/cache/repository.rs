//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Key-value cache with TTL support
///
/// Values travel as JSON strings so the trait stays dyn-compatible.
/// Typed access goes through [`CacheExt`].
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with a TTL
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes a value from the cache
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Deletes every key matching a glob pattern (`*` wildcard)
    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError>;

    /// Checks if a key exists in the cache
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// Clears all entries from the cache
    async fn clear(&self) -> Result<(), DomainError>;

    /// Returns approximate number of entries in the cache
    async fn size(&self) -> Result<usize, DomainError>;

    /// Round-trips the backend, used by readiness checks
    async fn ping(&self) -> Result<(), DomainError> {
        self.size().await.map(|_| ())
    }
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache(format!("Failed to deserialize cache value: {}", e))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a typed value in the cache with a TTL
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data, ttl).await
        }
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}

/// Translates a `*` glob into an anchored regex
pub fn glob_to_regex(pattern: &str) -> Result<regex::Regex, DomainError> {
    let escaped = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    regex::Regex::new(&format!("^{}$", escaped))
        .map_err(|e| DomainError::cache(format!("Invalid pattern: {}", e)))
}
