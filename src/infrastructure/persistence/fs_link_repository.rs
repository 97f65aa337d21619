//! Filesystem implementation of link repository.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::StorageError;

/// Name of the directory created under the data dir.
pub const RECORDS_DIR: &str = "db";

/// Extension of every record file.
pub const RECORD_EXTENSION: &str = "txt";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Stores each link as one JSON file named `<hash_id>.txt` in a flat directory.
///
/// Records are written to a temp file first and then moved into place, so
/// readers see either the old record or the new one, never a partial file.
///
/// Unlike the other backends, `create` never overwrites: the temp file is
/// hard-linked to the record name, which fails if it already exists, so a
/// second link with the same `hash_id` fails with [`StorageError::Conflict`]
/// and the first record is left untouched. Exactly one of several concurrent
/// creates for a key succeeds.
pub struct FsLinkRepository {
    dir: PathBuf,
}

impl FsLinkRepository {
    /// Opens the store rooted at `<data_dir>/db`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = data_dir.as_ref().join(RECORDS_DIR);
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, hash_id: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(hash_id) {
            return Err(StorageError::InvalidKey {
                hash_id: hash_id.to_string(),
            });
        }
        Ok(self.dir.join(format!("{hash_id}.{RECORD_EXTENSION}")))
    }

    /// Writes `payload` to a fresh hidden temp file next to the records.
    ///
    /// Temp names lack the record extension, so listings never pick them up.
    async fn write_temp(&self, hash_id: &str, payload: &[u8]) -> std::io::Result<PathBuf> {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!(
            ".{hash_id}.{RECORD_EXTENSION}.tmp-{}-{seq}",
            std::process::id()
        ));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            file.write_all(payload).await?;
            file.sync_all().await
        }
        .await;

        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }
        Ok(path)
    }
}

/// A key is usable when it names a single plain file inside the records directory.
fn is_valid_key(hash_id: &str) -> bool {
    !hash_id.is_empty()
        && hash_id != "."
        && hash_id != ".."
        && !hash_id.contains(['/', '\\', '\0'])
}

fn decode(hash_id: &str, raw: &str) -> Result<Link, StorageError> {
    Link::from_json(raw).map_err(|source| StorageError::Corrupt {
        hash_id: hash_id.to_string(),
        source,
    })
}

fn encode(link: &Link) -> Result<String, StorageError> {
    link.to_json().map_err(|source| StorageError::Corrupt {
        hash_id: link.hash_id.clone(),
        source,
    })
}

#[async_trait]
impl LinkRepository for FsLinkRepository {
    async fn create(&self, link: Link) -> Result<Link, StorageError> {
        let path = self.record_path(&link.hash_id)?;
        let payload = encode(&link)?;

        let tmp = self.write_temp(&link.hash_id, payload.as_bytes()).await?;
        let linked = fs::hard_link(&tmp, &path).await;
        let _ = fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => Ok(link),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::Conflict {
                hash_id: link.hash_id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_all(&self) -> Result<Vec<Link>, StorageError> {
        let suffix = format!(".{RECORD_EXTENSION}");
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut links = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(hash_id) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(suffix.as_str()))
                .filter(|hash_id| is_valid_key(hash_id))
            else {
                continue;
            };

            // Removed between listing and reading.
            if let Some(link) = self.get(hash_id).await? {
                links.push(link);
            }
        }

        Ok(links)
    }

    async fn get(&self, hash_id: &str) -> Result<Option<Link>, StorageError> {
        let path = self.record_path(hash_id)?;

        match fs::read_to_string(&path).await {
            Ok(raw) => decode(hash_id, &raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, link: Link, add_views: u64) -> Result<Link, StorageError> {
        let link = link.with_added_views(add_views);
        let path = self.record_path(&link.hash_id)?;
        let payload = encode(&link)?;

        let tmp = self.write_temp(&link.hash_id, payload.as_bytes()).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(link)
    }

    async fn delete(&self, hash_id: &str) -> Result<bool, StorageError> {
        let path = self.record_path(hash_id)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> bool {
        fs::metadata(&self.dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
