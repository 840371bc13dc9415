use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GramfeedError {
    #[error("Timed out after {after:?} fetching {url}")]
    Timeout { url: String, after: Duration },

    #[error("Blocked by upstream ({status}) fetching {url}")]
    Blocked { url: String, status: u16 },

    #[error("All {attempts} attempts failed for {url}")]
    AllAttemptsExhausted {
        url: String,
        attempts: usize,
        #[source]
        last: Box<GramfeedError>,
    },

    #[error("Failed to parse {what}: {detail}")]
    Parse { what: String, detail: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write feed: {0}")]
    Render(String),
}

impl GramfeedError {
    pub fn parse(what: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            detail: detail.into(),
        }
    }

    /// Whether the upstream explicitly refused the request
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// The innermost error behind an exhausted retry
    pub fn root(&self) -> &GramfeedError {
        match self {
            Self::AllAttemptsExhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for GramfeedError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GramfeedError>;
