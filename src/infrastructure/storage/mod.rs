//! Storage infrastructure - directory store implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageHandles, StorageType};
pub use in_memory::InMemoryStore;
#[cfg(test)]
pub(crate) use in_memory::testing::StaleReadStore;
pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresStore};
