//! Catalog entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thumbnail used when a record has none of its own.
pub const DEFAULT_THUMBNAIL: &str = "/placeholder.svg?height=200&width=300&text=Video";

/// Where a record came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    #[serde(rename = "built-in")]
    BuiltIn,

    #[serde(rename = "user")]
    User,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::BuiltIn
    }
}

/// A video in the catalog. Records are never changed once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub thumbnail: String,

    /// Embeddable form of `source_url`.
    #[serde(rename = "videoUrl", default)]
    pub video_url: String,

    /// The link as the user supplied it.
    #[serde(rename = "driveUrl", alias = "sourceUrl", default)]
    pub source_url: String,

    #[serde(rename = "dateAdded", default)]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(rename = "addedBy", default)]
    pub origin: Origin,
}

impl VideoRecord {
    /// The URL to play: the embed form, or the original link for entries
    /// that never had one.
    pub fn playable_url(&self) -> &str {
        if self.video_url.is_empty() {
            &self.source_url
        } else {
            &self.video_url
        }
    }
}

/// Fresh id for a user-submitted record, e.g. `user_1718000000000_3f9a0c2b1`.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("user_{}_{}", now.timestamp_millis(), &random[..9])
}
