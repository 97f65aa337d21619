//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL with its visit counter.
///
/// This is the record persisted by every storage backend. The encoded form is
/// a JSON object with exactly the fields `url`, `hash_id`, `created_at`
/// (RFC 3339 / ISO-8601) and `views`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub hash_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
}

impl Link {
    /// Creates a link with zero views.
    pub fn new(url: impl Into<String>, hash_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            hash_id: hash_id.into(),
            created_at,
            views: 0,
        }
    }

    /// Returns a copy with `views` increased by `add_views`.
    pub fn with_added_views(mut self, add_views: u64) -> Self {
        self.views = self.views.saturating_add(add_views);
        self
    }

    /// Encodes the link as a UTF-8 JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a link from its JSON encoding.
    ///
    /// A missing `views` field is read as `0`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
