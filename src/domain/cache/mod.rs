//! Cache domain - read-through caching for directory listings

mod index;
mod key;
mod repository;

pub use index::{CacheKeyIndex, DrainedKeys, DEFAULT_MAX_TRACKED_KEYS};
pub use key::{CacheKeys, CacheNamespace};
pub use repository::{glob_to_regex, Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
