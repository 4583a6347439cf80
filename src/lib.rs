//! Workforce API
//!
//! Department and employee directory served over HTTP with:
//! - JWT access/refresh authentication
//! - Read-through caching of listings (in-memory or Redis)
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::cache::CacheNamespace;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    cache::{CacheConfig, CacheFactory, CacheType},
    services::{ListCache, ListCacheConfig},
    storage::{PostgresConfig, StorageConfig, StorageFactory, StorageHandles, StorageType},
    user::{Argon2Hasher, CreateUserRequest, UserService},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = create_storage(config).await?;

    let cache_config = cache_config(config)?;
    info!(backend = %cache_config.cache_type, ttl_secs = config.cache.ttl_secs, "Cache backend");
    let cache = CacheFactory::new().create(&cache_config).await?;
    let list_cache = ListCache::with_config(
        cache,
        ListCacheConfig::default().with_default_ttl(cache_config.default_ttl),
    );

    // a shared backend may hold pages this process never recorded
    if cache_config.cache_type == CacheType::Redis {
        for namespace in [CacheNamespace::Departments, CacheNamespace::Employees] {
            let removed = list_cache.purge(namespace).await;
            info!(namespace = %namespace, removed, "Purged stale cached pages");
        }
    }

    let user_service = create_user_service(&storage);
    create_initial_admin_user(&user_service).await?;

    let jwt_service = Arc::new(create_jwt_service(config));

    Ok(AppState::new(
        storage.store,
        list_cache,
        user_service,
        jwt_service,
    ))
}

/// Open the configured store and user repository
pub async fn create_storage(config: &AppConfig) -> anyhow::Result<StorageHandles> {
    let storage_type = StorageType::from_str(&config.storage.backend)?;
    info!("Storage backend: {:?}", storage_type);

    let storage_config = match storage_type {
        StorageType::InMemory => StorageConfig::in_memory(),
        StorageType::Postgres => {
            info!("Connecting to PostgreSQL...");
            StorageConfig::postgres(postgres_config(config)?, config.storage.run_migrations)
        }
    };

    Ok(StorageFactory::create(&storage_config).await?)
}

/// PostgreSQL pool settings from the `storage` section
pub fn postgres_config(config: &AppConfig) -> anyhow::Result<PostgresConfig> {
    let url = config.storage.database_url.clone().ok_or_else(|| {
        anyhow::anyhow!("DATABASE_URL (or APP__STORAGE__DATABASE_URL) is required for postgres storage")
    })?;

    Ok(PostgresConfig::new(url)
        .with_max_connections(config.storage.max_connections)
        .with_min_connections(config.storage.min_connections))
}

pub fn create_user_service(storage: &StorageHandles) -> UserService {
    UserService::new(storage.users.clone(), Arc::new(Argon2Hasher::new()))
}

fn cache_config(config: &AppConfig) -> anyhow::Result<CacheConfig> {
    let cache_type = CacheType::from_str(&config.cache.backend)?;
    let ttl = Duration::from_secs(config.cache.ttl_secs);

    let mut cache_config = match cache_type {
        CacheType::InMemory => CacheConfig::in_memory(),
        CacheType::Redis => {
            let url = config.cache.redis_url.clone().ok_or_else(|| {
                anyhow::anyhow!("REDIS_URL (or APP__CACHE__REDIS_URL) is required for redis cache")
            })?;
            CacheConfig::redis(url)
        }
    }
    .with_default_ttl(ttl)
    .with_max_capacity(config.cache.max_capacity);

    if let Some(prefix) = &config.cache.key_prefix {
        cache_config = cache_config.with_key_prefix(prefix.clone());
    }

    Ok(cache_config)
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create JWT service from the configured secret, or a random one
fn create_jwt_service(config: &AppConfig) -> JwtService {
    let secret = config.auth.jwt_secret.clone().unwrap_or_else(|| {
        warn!(
            "No JWT_SECRET configured. Generating random secret. \
            Tokens will NOT survive a restart."
        );
        generate_random_secret()
    });

    JwtService::new(
        JwtConfig::new(secret)
            .with_access_token_minutes(config.auth.access_token_minutes)
            .with_refresh_token_hours(config.auth.refresh_token_hours),
    )
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create an initial admin user if no users exist
async fn create_initial_admin_user(user_service: &UserService) -> anyhow::Result<()> {
    if user_service.count().await? > 0 {
        return Ok(());
    }

    let (password, is_default) = match std::env::var("ADMIN_DEFAULT_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };

    user_service
        .create(CreateUserRequest::new("admin", password.clone()))
        .await?;

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Username: admin");

    if is_default {
        info!("Password: (set via ADMIN_DEFAULT_PASSWORD)");
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_from_sections() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 60;
        config.cache.key_prefix = Some("workforce".to_string());

        let cache_config = cache_config(&config).unwrap();

        assert_eq!(cache_config.cache_type, CacheType::InMemory);
        assert_eq!(cache_config.default_ttl, Duration::from_secs(60));
        assert_eq!(cache_config.key_prefix.as_deref(), Some("workforce"));
    }

    #[test]
    fn test_redis_requires_url() {
        let mut config = AppConfig::default();
        config.cache.backend = "redis".to_string();

        assert!(cache_config(&config).is_err());
    }

    #[test]
    fn test_postgres_requires_url() {
        assert!(postgres_config(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_random_secret_length() {
        assert_eq!(generate_random_secret().len(), 64);
        assert_ne!(generate_random_secret(), generate_random_secret());
    }

    #[tokio::test]
    async fn test_initial_admin_created_once() {
        let storage = StorageFactory::create_in_memory();
        let users = create_user_service(&storage);

        create_initial_admin_user(&users).await.unwrap();
        create_initial_admin_user(&users).await.unwrap();

        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_state_in_memory() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("state-test-secret".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(state.store().ping().await.is_ok());
        assert_eq!(state.user_service.count().await.unwrap(), 1);
    }
}
