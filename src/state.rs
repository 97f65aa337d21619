//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::config::StorageBackend;
use crate::domain::repositories::LinkRepository;

/// Application state cloned into handlers.
///
/// Holds the one repository instance built at startup, wrapped by the
/// service layer.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub base_url: String,
    pub backend: StorageBackend,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        base_url: impl Into<String>,
        backend: StorageBackend,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository)),
            base_url: base_url.into(),
            backend,
        }
    }
}
