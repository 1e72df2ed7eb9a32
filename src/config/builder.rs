//! Builder for `StillbrookConfig`
//!
//! Values are layered: compiled defaults, then environment variables via
//! [`StillbrookConfigBuilder::from_env`], then explicit `with_*` calls.
//! `build()` validates the result once so the rest of the crate can trust it.

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use super::types::StillbrookConfig;

/// Fluent builder for [`StillbrookConfig`]
#[derive(Debug, Clone, Default)]
pub struct StillbrookConfigBuilder {
    config: StillbrookConfig,
}

impl StillbrookConfig {
    /// Create a builder seeded with compiled defaults
    #[must_use]
    pub fn builder() -> StillbrookConfigBuilder {
        StillbrookConfigBuilder::default()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl StillbrookConfigBuilder {
    /// Seed a builder from the process environment
    ///
    /// Reads `SERPAPI_KEY` (or `SERPAPI_API_KEY`), `STILLBROOK_SEARCH_URL`,
    /// `STILLBROOK_RENDER_TIMEOUT_SECS`, `STILLBROOK_HEADLESS`,
    /// `STILLBROOK_BROWSER` and `CHROMIUM_PATH`. Unparseable values are
    /// ignored with a warning rather than rejected.
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = Self::default();

        if let Some(key) = env_non_empty("SERPAPI_KEY").or_else(|| env_non_empty("SERPAPI_API_KEY"))
        {
            builder.config.serpapi_key = Some(key);
        }

        if let Some(url) = env_non_empty("STILLBROOK_SEARCH_URL") {
            builder.config.search_url = url;
        }

        if let Some(raw) = env_non_empty("STILLBROOK_RENDER_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => builder.config.render_timeout_secs = secs,
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring STILLBROOK_RENDER_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = env_non_empty("STILLBROOK_HEADLESS") {
            match parse_bool(&raw) {
                Some(headless) => builder.config.headless = headless,
                None => tracing::warn!(value = %raw, "Ignoring STILLBROOK_HEADLESS"),
            }
        }

        if let Some(raw) = env_non_empty("STILLBROOK_BROWSER") {
            match parse_bool(&raw) {
                Some(enabled) => builder.config.browser_enabled = enabled,
                None => tracing::warn!(value = %raw, "Ignoring STILLBROOK_BROWSER"),
            }
        }

        if let Some(path) = env_non_empty("CHROMIUM_PATH") {
            builder.config.chrome_path = Some(PathBuf::from(path));
        }

        builder
    }

    #[must_use]
    pub fn serpapi_key(mut self, key: impl Into<String>) -> Self {
        self.config.serpapi_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    #[must_use]
    pub fn provider_timeout_secs(mut self, secs: u64) -> Self {
        self.config.provider_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.config.default_language = language.into();
        self
    }

    #[must_use]
    pub fn default_country_code(mut self, country: impl Into<String>) -> Self {
        self.config.default_country_code = country.into();
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Disable the browser path; renders go straight to the HTTP fallback
    #[must_use]
    pub fn browser_enabled(mut self, enabled: bool) -> Self {
        self.config.browser_enabled = enabled;
        self
    }

    #[must_use]
    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn sentiment_thresholds(mut self, negative: i32, positive: i32) -> Self {
        self.config.negative_sentiment_threshold = negative;
        self.config.positive_sentiment_threshold = positive;
        self
    }

    /// Validate and produce the configuration
    ///
    /// A missing SerpApi key is NOT a build error: it surfaces as a
    /// configuration error on the first search so the failure is audited.
    pub fn build(self) -> Result<StillbrookConfig> {
        let config = self.config;

        url::Url::parse(&config.search_url)
            .map_err(|e| anyhow!("Invalid search URL '{}': {e}", config.search_url))?;

        if config.provider_timeout_secs == 0 {
            return Err(anyhow!("provider_timeout_secs must be greater than zero"));
        }
        if config.render_timeout_secs == 0 {
            return Err(anyhow!("render_timeout_secs must be greater than zero"));
        }
        if config.viewport_width == 0 || config.viewport_height == 0 {
            return Err(anyhow!("viewport dimensions must be non-zero"));
        }
        if config.negative_sentiment_threshold >= 0 {
            return Err(anyhow!(
                "negative sentiment threshold must be below zero, got {}",
                config.negative_sentiment_threshold
            ));
        }
        if config.positive_sentiment_threshold <= 0 {
            return Err(anyhow!(
                "positive sentiment threshold must be above zero, got {}",
                config.positive_sentiment_threshold
            ));
        }

        Ok(config)
    }
}
