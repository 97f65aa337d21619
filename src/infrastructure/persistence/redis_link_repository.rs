//! Redis implementation of link repository.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::StorageError;

/// Stores each link as a JSON string value under its `hash_id` key.
///
/// `create` and `update` are plain `SET`s (last write wins, no TTL).
/// Listing runs `KEYS *` and reads every key, so the selected Redis database
/// must be dedicated to links: foreign keys would be decoded as links and
/// fail the listing. The listing is not a snapshot; keys removed while it
/// runs are skipped.
///
/// Every command is bounded by the configured timeout.
pub struct RedisLinkRepository {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisLinkRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Redis`] if the URL is invalid or the server is
    /// unreachable, and [`StorageError::Timeout`] if it does not answer in time.
    pub async fn connect(redis_url: &str, timeout: Duration) -> Result<Self, StorageError> {
        let client = Client::open(redis_url)?;
        let conn = bounded(timeout, "connect", ConnectionManager::new(client)).await?;

        let repo = Self { conn, timeout };
        let mut conn = repo.conn.clone();
        repo.run("ping", conn.ping::<()>()).await?;

        Ok(repo)
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        command: impl Future<Output = RedisResult<T>>,
    ) -> Result<T, StorageError> {
        bounded(self.timeout, operation, command).await
    }
}

async fn bounded<T>(
    timeout: Duration,
    operation: &'static str,
    command: impl Future<Output = RedisResult<T>>,
) -> Result<T, StorageError> {
    match tokio::time::timeout(timeout, command).await {
        Ok(result) => result.map_err(StorageError::from),
        Err(_) => Err(StorageError::Timeout { operation }),
    }
}

fn encode(link: &Link) -> Result<String, StorageError> {
    link.to_json().map_err(|source| StorageError::Corrupt {
        hash_id: link.hash_id.clone(),
        source,
    })
}

#[async_trait]
impl LinkRepository for RedisLinkRepository {
    async fn create(&self, link: Link) -> Result<Link, StorageError> {
        let payload = encode(&link)?;
        let mut conn = self.conn.clone();
        self.run("set", conn.set::<_, _, ()>(link.hash_id.as_str(), payload))
            .await?;
        Ok(link)
    }

    async fn get_all(&self) -> Result<Vec<Link>, StorageError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = self.run("keys", conn.keys("*")).await?;

        let mut links = Vec::with_capacity(keys.len());
        for hash_id in keys {
            if let Some(link) = self.get(&hash_id).await? {
                links.push(link);
            }
        }
        Ok(links)
    }

    async fn get(&self, hash_id: &str) -> Result<Option<Link>, StorageError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = self.run("get", conn.get(hash_id)).await?;

        raw.filter(|value| !value.is_empty())
            .map(|value| {
                Link::from_json(&value).map_err(|source| StorageError::Corrupt {
                    hash_id: hash_id.to_string(),
                    source,
                })
            })
            .transpose()
    }

    async fn update(&self, link: Link, add_views: u64) -> Result<Link, StorageError> {
        let link = link.with_added_views(add_views);
        let payload = encode(&link)?;
        let mut conn = self.conn.clone();
        self.run("set", conn.set::<_, _, ()>(link.hash_id.as_str(), payload))
            .await?;
        Ok(link)
    }

    async fn delete(&self, hash_id: &str) -> Result<bool, StorageError> {
        let mut conn = self.conn.clone();
        let removed: i64 = self.run("del", conn.del(hash_id)).await?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        self.run("ping", conn.ping::<()>()).await.is_ok()
    }
}
