//! # gramfeed
//!
//! Builds feeds from profile pages of a site that resists automated access.
//!
//! ## Architecture
//!
//! ```text
//! ProfileAggregator → RetryOrchestrator → PageFetcher → BrowserSession
//!         └──→ ResourceCache (post image sets) ──┘
//! ```
//!
//! - [`fetcher`]: single page fetches and the concurrent retry policy
//! - [`cache`]: single-flight memoization of post image sets
//! - [`feed`]: profile → listing → posts → feed entries
//! - [`render`]: HTML descriptions and RSS output
//!
//! ## Quick Start
//!
//! ```bash
//! # Print an RSS feed for a profile
//! gramfeed feed someone
//!
//! # JSON instead, written to a file
//! gramfeed feed someone --format json --output someone.json
//!
//! # Show the effective configuration
//! gramfeed config
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires config, browser launch
/// and the aggregator together.
pub mod app;

/// Browser automation seam.
///
/// - [`BrowserSession`](browser::BrowserSession): opens pages, closed once
/// - [`ChromeSession`](browser::ChromeSession): headless Chrome via chromiumoxide
pub mod browser;

/// Keyed cache with at most one in-flight computation per key.
pub mod cache;

/// Command-line interface using clap.
///
/// - `feed <profile>` - Build a feed
/// - `config` - Show the effective configuration
pub mod cli;

/// Configuration loaded from `~/.config/gramfeed/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`PostItem`](domain::PostItem): one entry of the post listing
/// - [`FeedEntry`](domain::FeedEntry): normalized feed item with SHA256 ID
/// - [`FeedResult`](domain::FeedResult): the complete feed
pub mod domain;

/// Feed assembly for a profile.
pub mod feed;

/// Page fetching with timeouts, block detection and retries.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for one retrieval
/// - [`PageFetcher`](fetcher::PageFetcher): browser-backed implementation
/// - [`RetryOrchestrator`](fetcher::RetryOrchestrator): immediate attempt plus concurrent retries
pub mod fetcher;

/// Document extraction and timestamp parsing.
pub mod parser;

/// HTML descriptions and RSS serialization.
pub mod render;
