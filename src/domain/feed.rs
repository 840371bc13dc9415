use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A normalized feed item derived from one post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub publish_date: DateTime<Utc>,
}

impl FeedEntry {
    /// Generate a deterministic ID from the profile URL and post short code
    pub fn generate_id(profile_link: &str, short_code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(profile_link.as_bytes());
        hasher.update(short_code.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// A complete feed for one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResult {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub items: Vec<FeedEntry>,
}
