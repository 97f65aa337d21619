//! Repository trait for link persistence.

use crate::domain::entities::Link;
use crate::error::StorageError;
use async_trait::async_trait;

/// Storage contract shared by every link backend.
///
/// Records are keyed by [`Link::hash_id`]. Values cross this boundary by
/// value: implementations copy or serialize what they are given and never hand
/// out references into their storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process memory
/// - [`crate::infrastructure::persistence::FsLinkRepository`] - one file per record
/// - [`crate::infrastructure::persistence::RedisLinkRepository`] - Redis key-value store
/// - Test mocks available with `cfg(test)`
///
/// # Duplicate keys
///
/// | Backend    | `create` on an existing key         |
/// |------------|-------------------------------------|
/// | in-memory  | overwrites                          |
/// | filesystem | fails with [`StorageError::Conflict`] |
/// | Redis      | overwrites                          |
///
/// # Examples
///
/// See integration tests: `tests/repository_*.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link under its `hash_id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] from backends that refuse to
    /// overwrite an existing record.
    async fn create(&self, link: Link) -> Result<Link, StorageError>;

    /// Returns every stored link.
    ///
    /// Order is backend-specific and not guaranteed stable between calls.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] as soon as one stored record fails to
    /// decode.
    async fn get_all(&self) -> Result<Vec<Link>, StorageError>;

    /// Finds a link by exact `hash_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn get(&self, hash_id: &str) -> Result<Option<Link>, StorageError>;

    /// Adds `add_views` to the link's counter and writes the full record.
    ///
    /// The counter is taken from the passed `link`, not re-read from storage,
    /// so concurrent updates of the same key are last-write-wins.
    async fn update(&self, link: Link, add_views: u64) -> Result<Link, StorageError>;

    /// Removes the record for `hash_id`.
    ///
    /// Returns `Ok(true)` if a record existed and was removed, `Ok(false)` otherwise.
    async fn delete(&self, hash_id: &str) -> Result<bool, StorageError>;

    /// Checks whether the backing medium is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}
