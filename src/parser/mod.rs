//! Extraction of profile metadata, post listings and post images from
//! fetched documents.

pub mod date;

pub use date::{parse_timestamp, UNIX_SECONDS};

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::app::{GramfeedError, Result};
use crate::domain::{PostImage, PostItem, PostKind, ProfileMeta};

const PROFILE_NAME: &str = "h1.fullname";
const PROFILE_USER_ID: &str = "input[name=userid]";
const PROFILE_BIO: &str = ".info .sum";
const PROFILE_AVATAR: &str = ".ava .pic img";
const POST_SLIDE_LINK: &str = ".post_slide a";
const SLIDE_IMAGE: &str = "img";

#[derive(Debug, Deserialize)]
struct Listing {
    posts: ListingPage,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    items: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    shortcode: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    sum_pure: String,
    time: serde_json::Value,
    #[serde(default)]
    pic: Option<String>,
}

impl RawPost {
    fn into_item(self) -> Result<PostItem> {
        let raw_timestamp = match self.time {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            other => {
                return Err(GramfeedError::parse(
                    "post listing",
                    format!("post {} has unusable time {}", self.shortcode, other),
                ))
            }
        };

        let mut item = PostItem::new(self.shortcode, PostKind::from_tag(&self.kind));
        item.raw_timestamp = raw_timestamp;
        item.summary = self.sum_pure;
        item.cover = self.pic.filter(|p| !p.is_empty());
        Ok(item)
    }
}

/// Reads the documents returned by the upstream site
#[derive(Debug, Clone, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract profile metadata from a rendered profile page
    pub fn profile(&self, profile_id: &str, link: &str, html: &str) -> Result<ProfileMeta> {
        let document = Html::parse_document(html);

        // Accounts without a full name render an empty heading
        let display_name = first_text(&document, PROFILE_NAME)?.unwrap_or_default();

        let user_id = first_attr(&document, PROFILE_USER_ID, "value")?
            .ok_or_else(|| GramfeedError::parse("profile page", "user id not found"))?;

        let bio = first_text(&document, PROFILE_BIO)?;
        let avatar = first_attr(&document, PROFILE_AVATAR, "src")?;

        debug!("Parsed profile {} (user id {})", profile_id, user_id);

        Ok(ProfileMeta {
            profile_id: profile_id.to_string(),
            display_name,
            user_id,
            bio,
            avatar,
            link: link.to_string(),
        })
    }

    /// Parse the JSON post listing.
    ///
    /// The browser may hand back the raw JSON or the JSON wrapped in its
    /// plain-text viewer markup; both are accepted.
    pub fn post_listing(&self, document: &str) -> Result<Vec<PostItem>> {
        let body = json_body(document)?;
        let listing: Listing = serde_json::from_str(&body)
            .map_err(|e| GramfeedError::parse("post listing", e.to_string()))?;

        listing
            .posts
            .items
            .into_iter()
            .map(RawPost::into_item)
            .collect()
    }

    /// Extract the ordered, de-duplicated image set of a multi-image post page
    pub fn post_images(&self, html: &str) -> Result<Vec<PostImage>> {
        let document = Html::parse_document(html);
        let link_selector = selector(POST_SLIDE_LINK)?;
        let image_selector = selector(SLIDE_IMAGE)?;

        let mut seen = HashSet::new();
        let mut images = Vec::new();

        for anchor in document.select(&link_selector) {
            let original_link = anchor.value().attr("href");
            let image_url = anchor
                .select(&image_selector)
                .next()
                .and_then(|img| img.value().attr("data-src"));

            let (Some(original_link), Some(image_url)) = (original_link, image_url) else {
                debug!("Skipping incomplete slide");
                continue;
            };

            let image = PostImage {
                original_link: original_link.to_string(),
                image_url: image_url.to_string(),
            };
            if seen.insert(image.clone()) {
                images.push(image);
            }
        }

        if images.is_empty() {
            return Err(GramfeedError::parse("post page", "no slides found"));
        }

        Ok(images)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| GramfeedError::parse("selector", format!("{}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty()))
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn json_body(document: &str) -> Result<String> {
    let trimmed = document.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let html = Html::parse_document(document);
    for css in ["pre", "body"] {
        if let Some(text) = first_text(&html, css)? {
            if text.starts_with('{') {
                return Ok(text);
            }
        }
    }

    Err(GramfeedError::parse("post listing", "no JSON body in document"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_HTML: &str = r#"<html><body>
        <div class="ava"><div class="pic"><img src="https://cdn.test/ava.jpg"></div></div>
        <h1 class="fullname"> Jane Doe </h1>
        <div class="info"><div class="sum">Photographer &amp; traveller</div></div>
        <form><input type="hidden" name="userid" value="123456"></form>
    </body></html>"#;

    const POST_HTML: &str = r#"<html><body>
        <div class="post_slide">
            <a href="https://cdn.test/1_orig.jpg"><img data-src="https://cdn.test/1.jpg"></a>
            <a href="https://cdn.test/2_orig.jpg"><img data-src="https://cdn.test/2.jpg"></a>
            <a href="https://cdn.test/1_orig.jpg"><img data-src="https://cdn.test/1.jpg"></a>
            <a href="https://cdn.test/3_orig.jpg"><img src="https://cdn.test/3.jpg"></a>
        </div>
    </body></html>"#;

    const LISTING_JSON: &str = r#"{"posts":{"items":[
        {"shortcode":"A1","type":"img_sig","sum_pure":"First","time":1700000000,"pic":"https://cdn.test/a.jpg"},
        {"shortcode":"B2","type":"img_multi","sum_pure":"Second","time":"1700000100"},
        {"shortcode":"C3","type":"video","sum_pure":"","time":1700000200}
    ]}}"#;

    #[test]
    fn test_parse_profile() {
        let parser = DocumentParser::new();
        let profile = parser
            .profile("jane", "https://site.test/profile/jane/", PROFILE_HTML)
            .unwrap();

        assert_eq!(profile.display_name, "Jane Doe");
        assert_eq!(profile.user_id, "123456");
        assert_eq!(profile.bio.as_deref(), Some("Photographer & traveller"));
        assert_eq!(profile.avatar.as_deref(), Some("https://cdn.test/ava.jpg"));
        assert_eq!(profile.link, "https://site.test/profile/jane/");
    }

    #[test]
    fn test_profile_without_display_name() {
        let parser = DocumentParser::new();
        let html = r#"<html><body>
            <h1 class="fullname"></h1>
            <input name="userid" value="77">
        </body></html>"#;

        let profile = parser.profile("anon", "https://site.test/profile/anon/", html).unwrap();
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.user_id, "77");

        let html = r#"<html><body><input name="userid" value="77"></body></html>"#;
        let profile = parser.profile("anon", "https://site.test/profile/anon/", html).unwrap();
        assert_eq!(profile.display_name, "");
    }

    #[test]
    fn test_profile_without_user_id_is_parse_error() {
        let parser = DocumentParser::new();
        let html = r#"<html><body><h1 class="fullname">Jane</h1></body></html>"#;

        let err = parser.profile("jane", "https://site.test/profile/jane/", html).unwrap_err();
        assert!(matches!(err, GramfeedError::Parse { .. }));
    }

    #[test]
    fn test_parse_listing() {
        let parser = DocumentParser::new();
        let posts = parser.post_listing(LISTING_JSON).unwrap();

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].short_code, "A1");
        assert_eq!(posts[0].kind, PostKind::Single);
        assert_eq!(posts[0].raw_timestamp, "1700000000");
        assert_eq!(posts[0].cover.as_deref(), Some("https://cdn.test/a.jpg"));
        assert_eq!(posts[1].kind, PostKind::MultiImage);
        assert_eq!(posts[1].raw_timestamp, "1700000100");
        assert_eq!(posts[2].kind, PostKind::Other);
        assert!(posts.iter().all(|p| p.images.is_empty()));
    }

    #[test]
    fn test_parse_listing_wrapped_in_viewer_markup() {
        let parser = DocumentParser::new();
        let wrapped = format!(
            "<html><head></head><body><pre style=\"word-wrap: break-word;\">{}</pre></body></html>",
            LISTING_JSON.replace('&', "&amp;")
        );

        let posts = parser.post_listing(&wrapped).unwrap();
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn test_listing_without_json_is_parse_error() {
        let parser = DocumentParser::new();
        let err = parser
            .post_listing("<html><body>Just a moment...</body></html>")
            .unwrap_err();
        assert!(matches!(err, GramfeedError::Parse { .. }));
    }

    #[test]
    fn test_listing_with_bad_time_is_parse_error() {
        let parser = DocumentParser::new();
        let json = r#"{"posts":{"items":[{"shortcode":"A1","type":"img_sig","time":null}]}}"#;
        assert!(parser.post_listing(json).is_err());
    }

    #[test]
    fn test_parse_post_images_dedups_in_order() {
        let parser = DocumentParser::new();
        let images = parser.post_images(POST_HTML).unwrap();

        assert_eq!(
            images,
            vec![
                PostImage {
                    original_link: "https://cdn.test/1_orig.jpg".into(),
                    image_url: "https://cdn.test/1.jpg".into(),
                },
                PostImage {
                    original_link: "https://cdn.test/2_orig.jpg".into(),
                    image_url: "https://cdn.test/2.jpg".into(),
                },
            ]
        );
    }

    #[test]
    fn test_post_without_slides_is_parse_error() {
        let parser = DocumentParser::new();
        assert!(parser.post_images("<html><body></body></html>").is_err());
    }
}
