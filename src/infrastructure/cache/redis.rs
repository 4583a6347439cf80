//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

const SCAN_BATCH: usize = 100;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: None,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// Redis cache over a multiplexed `ConnectionManager`
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Creates a new Redis cache connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    /// Collects every key matching an already prefixed glob using SCAN
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut found = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            found.extend(keys);
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        conn.get(&prefixed_key)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&prefixed_key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i64 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let keys = self.scan_keys(&self.config.prefix_key(pattern)).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;

        Ok(deleted as usize)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to check existence of key '{}': {}", key, e))
        })
    }

    async fn clear(&self) -> Result<(), DomainError> {
        // Without a prefix the whole logical database belongs to us
        match &self.config.key_prefix {
            Some(_) => {
                self.delete_pattern("*").await?;
            }
            None => {
                let mut conn = self.connection.clone();
                redis::cmd("FLUSHDB")
                    .query_async::<()>(&mut conn)
                    .await
                    .map_err(|e| DomainError::cache(format!("Failed to flush database: {}", e)))?;
            }
        }

        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        match &self.config.key_prefix {
            Some(_) => Ok(self.scan_keys(&self.config.prefix_key("*")).await?.len()),
            None => {
                let mut conn = self.connection.clone();
                redis::cmd("DBSIZE")
                    .query_async::<usize>(&mut conn)
                    .await
                    .map_err(|e| DomainError::cache(format!("Failed to get database size: {}", e)))
            }
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("workforce-test")
    }

    #[test]
    fn test_prefix_key() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("workforce");
        assert_eq!(config.prefix_key("departments_10_0"), "workforce:departments_10_0");

        let bare = RedisCacheConfig::new("redis://localhost");
        assert_eq!(bare.prefix_key("departments_10_0"), "departments_10_0");
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));

        cache.delete("key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_pattern() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let ttl = Duration::from_secs(60);

        cache.set_raw("employees_10_0", "[]", ttl).await.unwrap();
        cache.set_raw("employees_salary_10_0", "[]", ttl).await.unwrap();
        cache.set_raw("departments_10_0", "[]", ttl).await.unwrap();

        let deleted = cache.delete_pattern("employees_*").await.unwrap();
        assert_eq!(deleted, 2);
        assert!(cache.exists("departments_10_0").await.unwrap());

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ping() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        assert!(cache.ping().await.is_ok());
    }
}
