//! In-memory implementation of link repository.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::StorageError;

#[derive(Default)]
struct Inner {
    links: HashMap<String, Link>,
    /// Keys in first-insertion order.
    order: Vec<String>,
}

impl Inner {
    fn put(&mut self, link: Link) {
        if !self.links.contains_key(&link.hash_id) {
            self.order.push(link.hash_id.clone());
        }
        self.links.insert(link.hash_id.clone(), link);
    }
}

/// Process-local link storage, lost on restart.
///
/// A single mutex guards the map; it is never held across an `.await`.
/// `create` and `update` overwrite unconditionally. Listing returns links in
/// the order their keys were first inserted.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, link: Link) -> Result<Link, StorageError> {
        self.inner.lock().put(link.clone());
        Ok(link)
    }

    async fn get_all(&self) -> Result<Vec<Link>, StorageError> {
        let inner = self.inner.lock();
        Ok(inner
            .order
            .iter()
            .filter_map(|hash_id| inner.links.get(hash_id).cloned())
            .collect())
    }

    async fn get(&self, hash_id: &str) -> Result<Option<Link>, StorageError> {
        Ok(self.inner.lock().links.get(hash_id).cloned())
    }

    async fn update(&self, link: Link, add_views: u64) -> Result<Link, StorageError> {
        let link = link.with_added_views(add_views);
        self.inner.lock().put(link.clone());
        Ok(link)
    }

    async fn delete(&self, hash_id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.lock();
        if inner.links.remove(hash_id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|key| key != hash_id);
        Ok(true)
    }
}
