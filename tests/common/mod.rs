#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use link_shortener::config::StorageBackend;
use link_shortener::domain::entities::Link;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::MemoryLinkRepository;
use link_shortener::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "http://s.test";

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()
}

pub fn sample_link(hash_id: &str) -> Link {
    Link::new("http://example.com", hash_id, fixed_time())
}

pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let state = AppState::new(repo.clone(), BASE_URL, StorageBackend::Memory);
    (state, repo)
}

/// Behaviour every backend shares: create, read back, list, count views, delete.
pub async fn assert_basic_contract(repo: &dyn LinkRepository) {
    let link = sample_link("abc");

    let created = repo.create(link.clone()).await.unwrap();
    assert_eq!(created, link);

    let all = repo.get_all().await.unwrap();
    assert_eq!(all, vec![link.clone()]);

    let fetched = repo.get("abc").await.unwrap().unwrap();
    let updated = repo.update(fetched, 1).await.unwrap();
    assert_eq!(updated.views, 1);
    assert_eq!(repo.get("abc").await.unwrap().unwrap().views, 1);

    assert!(repo.delete("abc").await.unwrap());
    assert!(repo.get("abc").await.unwrap().is_none());
    assert!(!repo.delete("abc").await.unwrap());
}

/// `update` adds exactly the requested amount and accumulates.
pub async fn assert_update_accumulates(repo: &dyn LinkRepository) {
    let link = repo.create(sample_link("views")).await.unwrap();

    let link = repo.update(link, 3).await.unwrap();
    assert_eq!(link.views, 3);
    assert_eq!(repo.get("views").await.unwrap().unwrap().views, 3);

    let link = repo.update(link, 1).await.unwrap();
    assert_eq!(link.views, 4);

    let stored = repo.get("views").await.unwrap().unwrap();
    assert_eq!(stored.views, 4);
    assert_eq!(stored.created_at, fixed_time());
    assert_eq!(stored.url, "http://example.com");
}
