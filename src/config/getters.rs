//! Getter methods for `StillbrookConfig`

use std::path::Path;
use std::time::Duration;

use super::types::StillbrookConfig;
use crate::renderer::RenderOptions;
use crate::sentiment::SentimentThresholds;

impl StillbrookConfig {
    #[must_use]
    pub fn serpapi_key(&self) -> Option<&str> {
        self.serpapi_key.as_deref()
    }

    #[must_use]
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    #[must_use]
    pub fn default_country_code(&self) -> &str {
        &self.default_country_code
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_path(&self) -> Option<&Path> {
        self.chrome_path.as_deref()
    }

    #[must_use]
    pub fn browser_enabled(&self) -> bool {
        self.browser_enabled
    }

    #[must_use]
    pub fn negative_sentiment_threshold(&self) -> i32 {
        self.negative_sentiment_threshold
    }

    #[must_use]
    pub fn positive_sentiment_threshold(&self) -> i32 {
        self.positive_sentiment_threshold
    }

    #[must_use]
    pub fn sentiment_thresholds(&self) -> SentimentThresholds {
        SentimentThresholds {
            negative: self.negative_sentiment_threshold,
            positive: self.positive_sentiment_threshold,
        }
    }

    /// Base render options; the orchestrator adjusts lazy-scroll per request
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            timeout: Duration::from_secs(self.render_timeout_secs),
            user_agent: self.user_agent.clone(),
            ..RenderOptions::default()
        }
    }
}
