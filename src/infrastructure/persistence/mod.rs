//! Link repository backends.
//!
//! Concrete implementations of [`LinkRepository`], one per storage medium.
//! The backend is chosen once at startup from [`Config::storage_backend`].
//!
//! # Repositories
//!
//! - [`MemoryLinkRepository`] - process memory, insertion-ordered
//! - [`FsLinkRepository`] - one JSON file per link, refuses duplicate keys
//! - [`RedisLinkRepository`] - one JSON string value per key

pub mod fs_link_repository;
pub mod memory_link_repository;
pub mod redis_link_repository;

pub use fs_link_repository::FsLinkRepository;
pub use memory_link_repository::MemoryLinkRepository;
pub use redis_link_repository::RedisLinkRepository;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::LinkRepository;
use crate::error::StorageError;

/// Builds the repository selected by the configuration.
///
/// # Errors
///
/// Returns an error if the records directory cannot be created or the Redis
/// server cannot be reached.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>, StorageError> {
    let repository: Arc<dyn LinkRepository> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryLinkRepository::new()),
        StorageBackend::Fs => Arc::new(FsLinkRepository::open(&config.data_dir).await?),
        StorageBackend::Redis => {
            let redis_url = config.redis_url.as_deref().unwrap_or_default();
            let timeout = Duration::from_millis(config.redis_timeout_ms);
            Arc::new(RedisLinkRepository::connect(redis_url, timeout).await?)
        }
    };

    Ok(repository)
}
