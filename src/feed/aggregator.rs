use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};
use url::Url;

use crate::app::{GramfeedError, Result};
use crate::browser::BrowserSession;
use crate::cache::ResourceCache;
use crate::config::Config;
use crate::domain::{FeedEntry, FeedResult, PostImage, PostItem, ProfileMeta};
use crate::feed::FeedConfig;
use crate::fetcher::{PageFetcher, RetryOrchestrator};
use crate::parser::{parse_timestamp, DocumentParser, UNIX_SECONDS};
use crate::render::render_description;

/// Builds a feed for one profile from its profile page, post listing and
/// post detail pages.
///
/// The image cache lives as long as the aggregator, so a long-running
/// process reuses resolved image sets across builds.
pub struct ProfileAggregator {
    base_url: String,
    retry: RetryOrchestrator,
    images: ResourceCache<Vec<PostImage>>,
    parser: DocumentParser,
    config: FeedConfig,
}

impl ProfileAggregator {
    pub fn new(base_url: impl Into<String>, retry: RetryOrchestrator, config: FeedConfig) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            retry,
            images: ResourceCache::new(),
            parser: DocumentParser::new(),
            config,
        }
    }

    /// Wire a browser-backed aggregator from application config
    pub fn from_config(config: &Config) -> Self {
        let fetcher = Arc::new(PageFetcher::new(config.fetch.clone()));
        let retry = RetryOrchestrator::new(fetcher, config.retry.clone());
        Self::new(config.base_url.clone(), retry, config.feed.clone())
    }

    /// Resolved image sets, keyed by post link
    pub fn image_cache(&self) -> &ResourceCache<Vec<PostImage>> {
        &self.images
    }

    pub fn profile_url(&self, profile_id: &str) -> String {
        format!("{}/profile/{}/", self.base_url, profile_id)
    }

    pub fn listing_url(&self, user_id: &str) -> Result<String> {
        let url = Url::parse_with_params(&format!("{}/api/posts", self.base_url), &[("userid", user_id)])
            .map_err(|e| GramfeedError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        Ok(url.to_string())
    }

    /// Build the feed, then close `session` exactly once whether or not the
    /// build succeeded.
    pub async fn run(&self, profile_id: &str, session: &dyn BrowserSession) -> Result<FeedResult> {
        let result = self.build_feed(profile_id, session).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        result
    }

    pub async fn build_feed(&self, profile_id: &str, session: &dyn BrowserSession) -> Result<FeedResult> {
        info!("Building feed for {}", profile_id);

        let profile_url = self.profile_url(profile_id);
        let html = self.retry.fetch_with_retry(&profile_url, session).await?;
        let profile = self.parser.profile(profile_id, &profile_url, &html)?;

        let listing_url = self.listing_url(&profile.user_id)?;
        let body = self.retry.fetch_with_retry(&listing_url, session).await?;
        let posts = self.parser.post_listing(&body)?;
        debug!("Listing for {} has {} posts", profile_id, posts.len());

        let posts: Vec<PostItem> = stream::iter(posts)
            .map(|post| self.resolve_post(post, session))
            .buffered(self.config.detail_concurrency.max(1))
            .try_collect()
            .await?;

        let items = posts
            .iter()
            .map(|post| self.entry_for(&profile, post))
            .collect::<Result<Vec<_>>>()?;

        info!("Built feed for {} with {} entries", profile_id, items.len());

        Ok(FeedResult {
            title: format!("{} (@{}) - Picnob", profile.display_name, profile.profile_id),
            description: profile.bio.unwrap_or_default(),
            link: profile.link,
            image: profile.avatar,
            items,
        })
    }

    async fn resolve_post(&self, mut post: PostItem, session: &dyn BrowserSession) -> Result<PostItem> {
        if !post.is_multi_image() {
            return Ok(post);
        }

        let link = post.link(&self.base_url);
        let resolved = self
            .images
            .try_get(&link, || async {
                let html = self.retry.fetch_with_retry(&link, session).await?;
                self.parser.post_images(&html)
            })
            .await;

        match resolved {
            Ok(images) => post.images = images,
            Err(e) if self.config.isolate_post_failures => {
                warn!("Keeping {} without images: {}", link, e);
            }
            Err(e) => return Err(e),
        }

        Ok(post)
    }

    fn entry_for(&self, profile: &ProfileMeta, post: &PostItem) -> Result<FeedEntry> {
        Ok(FeedEntry {
            id: FeedEntry::generate_id(&profile.link, &post.short_code),
            title: post.summary.clone(),
            description: render_description(post),
            link: post.link(&self.base_url),
            publish_date: parse_timestamp(&post.raw_timestamp, UNIX_SECONDS)?,
        })
    }
}
