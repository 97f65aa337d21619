mod common;

use link_shortener::domain::entities::Link;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::error::StorageError;
use link_shortener::infrastructure::persistence::FsLinkRepository;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

async fn open_repo() -> (TempDir, FsLinkRepository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = FsLinkRepository::open(temp_dir.path()).await.unwrap();
    (temp_dir, repo)
}

#[tokio::test]
async fn test_basic_contract() {
    let (_dir, repo) = open_repo().await;
    common::assert_basic_contract(&repo).await;
}

#[tokio::test]
async fn test_update_accumulates() {
    let (_dir, repo) = open_repo().await;
    common::assert_update_accumulates(&repo).await;
}

#[tokio::test]
async fn test_open_creates_db_directory_idempotently() {
    let temp_dir = TempDir::new().unwrap();

    let repo = FsLinkRepository::open(temp_dir.path()).await.unwrap();
    assert_eq!(repo.dir(), temp_dir.path().join("db"));
    assert!(repo.dir().is_dir());

    let reopened = FsLinkRepository::open(temp_dir.path()).await;
    assert!(reopened.is_ok());
}

#[tokio::test]
async fn test_record_file_layout() {
    let (_dir, repo) = open_repo().await;
    let mut link = common::sample_link("abc");
    link.views = 7;

    repo.create(link.clone()).await.unwrap();

    let path = repo.dir().join("abc.txt");
    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["url"], "http://example.com");
    assert_eq!(value["hash_id"], "abc");
    assert_eq!(value["created_at"], "2024-05-17T08:30:00Z");
    assert_eq!(value["views"], 7);
}

#[tokio::test]
async fn test_duplicate_create_fails_and_keeps_first() {
    let (_dir, repo) = open_repo().await;

    let first = common::sample_link("dup");
    repo.create(first.clone()).await.unwrap();

    let second = Link::new("http://other.com", "dup", common::fixed_time());
    let result = repo.create(second).await;

    assert!(matches!(result, Err(StorageError::Conflict { ref hash_id }) if hash_id == "dup"));
    assert_eq!(repo.get("dup").await.unwrap().unwrap(), first);
}

#[tokio::test]
async fn test_concurrent_creates_have_exactly_one_winner() {
    let (_dir, repo) = open_repo().await;
    let repo = Arc::new(repo);

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let link = Link::new(format!("http://example.com/{i}"), "race", common::fixed_time());
            repo.create(link).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StorageError::Conflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);

    let stored = repo.get("race").await.unwrap().unwrap();
    assert!(stored.url.starts_with("http://example.com/"));
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let (_dir, repo) = open_repo().await;
    assert!(repo.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_listing_reads_every_record() {
    let (_dir, repo) = open_repo().await;
    for hash_id in ["one", "two", "three"] {
        repo.create(common::sample_link(hash_id)).await.unwrap();
    }

    let mut ids: Vec<String> = repo
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.hash_id)
        .collect();
    ids.sort();

    assert_eq!(ids, ["one", "three", "two"]);
}

#[tokio::test]
async fn test_listing_ignores_foreign_files() {
    let (_dir, repo) = open_repo().await;
    repo.create(common::sample_link("abc")).await.unwrap();
    std::fs::write(repo.dir().join("notes.md"), "not a link").unwrap();

    let all = repo.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_corrupt_record_fails_listing() {
    let (_dir, repo) = open_repo().await;
    repo.create(common::sample_link("good")).await.unwrap();
    std::fs::write(repo.dir().join("bad.txt"), "{ definitely not json").unwrap();

    let result = repo.get_all().await;
    assert!(matches!(result, Err(StorageError::Corrupt { ref hash_id, .. }) if hash_id == "bad"));

    let single = repo.get("bad").await;
    assert!(matches!(single, Err(StorageError::Corrupt { .. })));
    assert!(repo.get("good").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_overwrites_whole_record() {
    let (_dir, repo) = open_repo().await;
    let link = repo.create(common::sample_link("abc")).await.unwrap();

    repo.update(link, 250).await.unwrap();

    let raw = std::fs::read_to_string(repo.dir().join("abc.txt")).unwrap();
    let decoded = Link::from_json(&raw).unwrap();
    assert_eq!(decoded.views, 250);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_partial_records_during_updates() {
    let (_dir, repo) = open_repo().await;
    let repo = Arc::new(repo);
    let link = repo.create(common::sample_link("abc")).await.unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let repo = repo.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut link = link;
            let mut failure = None;
            for _ in 0..500 {
                match repo.update(link.clone(), 1).await {
                    Ok(updated) => link = updated,
                    Err(e) => {
                        failure = Some(e.to_string());
                        break;
                    }
                }
            }
            done.store(true, Ordering::SeqCst);
            (link, failure)
        })
    };

    let mut readers = Vec::new();
    for _ in 0..3 {
        let repo = repo.clone();
        let done = done.clone();
        readers.push(tokio::spawn(async move {
            let mut reads = 0u64;
            while !done.load(Ordering::SeqCst) {
                let stored = repo.get("abc").await.unwrap();
                assert!(stored.is_some());
                assert_eq!(repo.get_all().await.unwrap().len(), 1);
                reads += 1;
            }
            reads
        }));
    }

    let (last, failure) = writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(failure, None);

    assert_eq!(last.views, 500);
    assert_eq!(repo.get("abc").await.unwrap().unwrap().views, 500);
}

#[tokio::test]
async fn test_writes_leave_no_temp_files() {
    let (_dir, repo) = open_repo().await;
    let link = repo.create(common::sample_link("abc")).await.unwrap();
    repo.update(link, 3).await.unwrap();
    let _ = repo.create(common::sample_link("abc")).await;

    let names: Vec<String> = std::fs::read_dir(repo.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, ["abc.txt"]);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let repo = FsLinkRepository::open(temp_dir.path()).await.unwrap();
        repo.create(common::sample_link("durable")).await.unwrap();
    }

    let repo = FsLinkRepository::open(temp_dir.path()).await.unwrap();
    assert_eq!(
        repo.get("durable").await.unwrap().unwrap(),
        common::sample_link("durable")
    );
}

#[tokio::test]
async fn test_path_like_keys_are_rejected() {
    let (_dir, repo) = open_repo().await;

    let result = repo
        .create(Link::new("http://example.com", "../escape", common::fixed_time()))
        .await;
    assert!(matches!(result, Err(StorageError::InvalidKey { .. })));

    assert!(matches!(
        repo.get("a/b").await,
        Err(StorageError::InvalidKey { .. })
    ));
    assert!(matches!(
        repo.delete("..").await,
        Err(StorageError::InvalidKey { .. })
    ));
}

#[tokio::test]
async fn test_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FsLinkRepository::open(temp_dir.path()).await.unwrap();
    assert!(repo.health_check().await);

    std::fs::remove_dir_all(repo.dir()).unwrap();
    assert!(!repo.health_check().await);
}
