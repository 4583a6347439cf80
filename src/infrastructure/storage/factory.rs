//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::info;

use crate::domain::store::Store;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::in_memory::InMemoryStore;
use super::migrations::run_migrations;
use super::postgres::{PostgresConfig, PostgresStore};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage type: {}. Valid types: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres {
        config: PostgresConfig,
        run_migrations: bool,
    },
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig, run_migrations: bool) -> Self {
        Self::Postgres {
            config,
            run_migrations,
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres { .. } => StorageType::Postgres,
        }
    }
}

/// The directory store and user repository sharing one backend
#[derive(Clone)]
pub struct StorageHandles {
    pub store: Arc<dyn Store>,
    pub users: Arc<dyn UserRepository>,
}

impl std::fmt::Debug for StorageHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageHandles")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the store and user repository based on the configuration
    pub async fn create(config: &StorageConfig) -> Result<StorageHandles, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory()),
            StorageConfig::Postgres {
                config,
                run_migrations: migrate,
            } => {
                let pool = config.connect().await?;

                if *migrate {
                    let applied = run_migrations(&pool).await?;
                    info!(applied, "Database migrations complete");
                }

                Ok(StorageHandles {
                    store: Arc::new(PostgresStore::new(pool.clone())),
                    users: Arc::new(PostgresUserRepository::new(pool)),
                })
            }
        }
    }

    /// Creates in-memory storage
    pub fn create_in_memory() -> StorageHandles {
        StorageHandles {
            store: Arc::new(InMemoryStore::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in_memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("postgres".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("PG".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("sqlite".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_type() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);

        let config = StorageConfig::postgres(PostgresConfig::default(), true);
        assert_eq!(config.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let handles = StorageFactory::create(&StorageConfig::in_memory()).await.unwrap();

        assert!(handles.store.ping().await.is_ok());
        assert_eq!(handles.users.count().await.unwrap(), 0);
    }
}
