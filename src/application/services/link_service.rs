//! Link creation, lookup, visit counting and removal.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_hash_id, is_reserved};

/// Service implementing the shortener flows on top of a [`LinkRepository`].
///
/// Short ids are either supplied by the caller (used verbatim, no uniqueness
/// check) or derived from the URL with the rolling hash. Duplicate handling is
/// whatever the repository does: overwrite, or [`AppError::Conflict`] for the
/// filesystem backend.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates and stores a short link.
    ///
    /// # Arguments
    ///
    /// - `url` - Destination address; any non-empty string is accepted
    /// - `custom_hash` - Optional short id used as-is instead of the generated one
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `url` or `custom_hash` is empty, or
    /// if `custom_hash` is reserved by a system route.
    /// Returns [`AppError::Conflict`] if the backend refuses an existing key.
    pub async fn create_link(
        &self,
        url: String,
        custom_hash: Option<String>,
    ) -> Result<Link, AppError> {
        if url.is_empty() {
            return Err(AppError::bad_request("URL must not be empty", json!({})));
        }

        let hash_id = match custom_hash {
            Some(custom) if custom.is_empty() => {
                return Err(AppError::bad_request(
                    "Custom short id must not be empty",
                    json!({}),
                ));
            }
            Some(custom) if is_reserved(&custom) => {
                return Err(AppError::bad_request(
                    "This short id is reserved",
                    json!({ "hash_id": custom }),
                ));
            }
            Some(custom) => custom,
            None => generate_hash_id(&url),
        };

        let link = Link::new(url, hash_id, Utc::now());
        let link = self.link_repository.create(link).await?;

        tracing::info!(hash_id = %link.hash_id, url = %link.url, "Link created");
        Ok(link)
    }

    /// Returns every stored link.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.link_repository.get_all().await?)
    }

    /// Retrieves a link without counting a view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this short id.
    pub async fn get_link(&self, hash_id: &str) -> Result<Link, AppError> {
        self.link_repository
            .get(hash_id)
            .await?
            .ok_or_else(|| not_found(hash_id))
    }

    /// Resolves a short id for a redirect and counts one view.
    ///
    /// Returns the link with its updated counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this short id.
    pub async fn visit(&self, hash_id: &str) -> Result<Link, AppError> {
        let link = self.get_link(hash_id).await?;
        self.count_view(link).await
    }

    /// Counts one view on an already resolved link and returns it updated.
    pub async fn count_view(&self, link: Link) -> Result<Link, AppError> {
        let link = self.link_repository.update(link, 1).await?;

        tracing::debug!(hash_id = %link.hash_id, views = link.views, "Link visited");
        Ok(link)
    }

    /// Removes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there was nothing to remove.
    pub async fn delete_link(&self, hash_id: &str) -> Result<(), AppError> {
        if !self.link_repository.delete(hash_id).await? {
            return Err(not_found(hash_id));
        }

        tracing::info!(hash_id, "Link deleted");
        Ok(())
    }

    /// Checks whether the underlying storage is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    /// Constructs the full short URL from a base URL and a short id.
    pub fn short_url(&self, base_url: &str, hash_id: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), hash_id)
    }
}

fn not_found(hash_id: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "hash_id": hash_id }))
}
