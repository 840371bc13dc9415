//! Configuration management for gramfeed.
//!
//! Configuration is read from `~/.config/gramfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::browser::LaunchConfig;
use crate::feed::FeedConfig;
use crate::fetcher::{FetchConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://www.pixwox.com";

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the upstream site
    pub base_url: String,
    pub browser: LaunchConfig,
    pub fetch: FetchConfig,
    pub retry: RetryPolicy,
    pub feed: FeedConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: LaunchConfig::default(),
            fetch: FetchConfig::default(),
            retry: RetryPolicy::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default config file is created with comments. An explicit
    /// path must exist. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/gramfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gramfeed").join("config.toml"))
    }

    /// Reject values the fetch layer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {}", self.base_url, e)))?;

        self.retry
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.feed.detail_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "feed.detail_concurrency must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# gramfeed configuration

# Root URL of the upstream site
base_url = "https://www.pixwox.com"

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Chrome/Chromium binary; searched on PATH when omitted
# executable = "/usr/bin/chromium"

window_width = 1920
window_height = 1080

# Extra switches passed to the browser
extra_args = []

[fetch]
# Navigation timeout in seconds
timeout_secs = 30

# Wait after navigation before reading the page (milliseconds)
settle_ms = 2000

# Headers sent with every page request
accept_language = "en-US,en;q=0.9"
accept = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
referer = "https://www.google.com/"

[retry]
# Total attempts per page, including the first one
max_attempts = 3

# Delay before the retry batch (milliseconds)
retry_delay_ms = 2000

# Try once right away before launching delayed retries
immediate_first_attempt = true

# Retries allowed in flight at once
max_concurrency = 4

# Longer delay used when the first attempt was refused with 403
# blocked_retry_delay_ms = 10000

[feed]
# Post detail pages resolved at once
detail_concurrency = 4

# Keep posts whose images could not be fetched instead of failing the feed
isolate_post_failures = false
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
