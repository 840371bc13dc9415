use crate::app::error::Result;
use crate::browser::ChromeSession;
use crate::config::Config;
use crate::domain::FeedResult;
use crate::feed::ProfileAggregator;

pub struct AppContext {
    pub config: Config,
    pub aggregator: ProfileAggregator,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let aggregator = ProfileAggregator::from_config(&config);
        Self { config, aggregator }
    }

    pub async fn launch_session(&self) -> Result<ChromeSession> {
        ChromeSession::launch(&self.config.browser).await
    }

    /// Launch a browser, build the feed for `profile_id` and shut the browser down
    pub async fn build_feed(&self, profile_id: &str) -> Result<FeedResult> {
        let session = self.launch_session().await?;
        self.aggregator.run(profile_id, &session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_uses_configured_base_url() {
        let config = Config {
            base_url: "https://mirror.test/".into(),
            ..Default::default()
        };
        let ctx = AppContext::new(config);

        assert_eq!(ctx.aggregator.profile_url("jane"), "https://mirror.test/profile/jane/");
        assert!(ctx.aggregator.image_cache().is_empty());
    }
}
