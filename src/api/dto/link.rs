//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Link;

/// Characters allowed in a caller-chosen short id.
static HASH_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid hash id regex"));

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination address. Not checked beyond being non-empty.
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,

    /// Optional short id, used verbatim instead of the generated one.
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = *HASH_ID_REGEX))]
    pub hash_id: Option<String>,
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
    pub hash_id: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub views: u64,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            url: link.url,
            hash_id: link.hash_id,
            short_url,
            created_at: link.created_at,
            views: link.views,
        }
    }
}

/// All stored links.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}
