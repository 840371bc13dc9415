use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Single,
    MultiImage,
    Other,
}

impl PostKind {
    /// Map the listing's `type` tag onto a post kind
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "img_multi" => Self::MultiImage,
            "img_sig" => Self::Single,
            _ => Self::Other,
        }
    }
}

/// One slide of a multi-image post
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostImage {
    pub original_link: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostItem {
    pub short_code: String,
    pub kind: PostKind,
    pub raw_timestamp: String,
    pub summary: String,
    pub cover: Option<String>,
    /// Filled for multi-image posts once the detail page is resolved
    pub images: Vec<PostImage>,
}

impl PostItem {
    pub fn new(short_code: impl Into<String>, kind: PostKind) -> Self {
        Self {
            short_code: short_code.into(),
            kind,
            raw_timestamp: String::new(),
            summary: String::new(),
            cover: None,
            images: Vec::new(),
        }
    }

    /// Canonical post URL, also used as the image-cache key
    pub fn link(&self, base_url: &str) -> String {
        format!("{}/post/{}/", base_url.trim_end_matches('/'), self.short_code)
    }

    pub fn is_multi_image(&self) -> bool {
        self.kind == PostKind::MultiImage
    }
}

/// Profile metadata scraped from the profile page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub profile_id: String,
    pub display_name: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub link: String,
}
