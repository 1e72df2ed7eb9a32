//! Core configuration types for the search pipeline
//!
//! `StillbrookConfig` carries everything that is fixed for the lifetime of
//! the process: provider credential and endpoint, browser launch settings,
//! render tuning and sentiment thresholds. Per-request rules live in
//! [`crate::classifier::MatchRuleConfig`] instead.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_COUNTRY_CODE, DEFAULT_LANGUAGE, DEFAULT_RENDER_TIMEOUT_SECS,
    DEFAULT_SEARCH_URL, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
    NEGATIVE_SENTIMENT_THRESHOLD, POSITIVE_SENTIMENT_THRESHOLD, PROVIDER_TIMEOUT_SECS,
};

/// Process-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StillbrookConfig {
    /// SerpApi credential. Never serialized.
    #[serde(skip)]
    pub(crate) serpapi_key: Option<String>,

    /// Provider JSON endpoint
    pub(crate) search_url: String,

    /// Timeout in seconds for one provider request
    ///
    /// Default: 30 seconds
    pub(crate) provider_timeout_secs: u64,

    /// Language used when the request does not name one
    pub(crate) default_language: String,

    /// Country code used when the request does not name one
    pub(crate) default_country_code: String,

    /// Run Chromium without a window
    pub(crate) headless: bool,

    /// Explicit Chromium executable; discovery runs when unset
    pub(crate) chrome_path: Option<PathBuf>,

    /// Skip the browser and go straight to the plain HTTP fetch
    pub(crate) browser_enabled: bool,

    /// Timeout in seconds for navigation and extraction
    ///
    /// Default: 30 seconds
    pub(crate) render_timeout_secs: u64,

    pub(crate) viewport_width: u32,
    pub(crate) viewport_height: u32,
    pub(crate) user_agent: String,

    /// Score at or below which the negative sentiment rule fires
    pub(crate) negative_sentiment_threshold: i32,

    /// Score at or above which the positive sentiment rule fires
    pub(crate) positive_sentiment_threshold: i32,
}

impl Default for StillbrookConfig {
    fn default() -> Self {
        Self {
            serpapi_key: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            provider_timeout_secs: PROVIDER_TIMEOUT_SECS,
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            headless: true,
            chrome_path: None,
            browser_enabled: true,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            user_agent: CHROME_USER_AGENT.to_string(),
            negative_sentiment_threshold: NEGATIVE_SENTIMENT_THRESHOLD,
            positive_sentiment_threshold: POSITIVE_SENTIMENT_THRESHOLD,
        }
    }
}
