//! Per-render options

use std::time::Duration;

use url::Url;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH, DYNAMIC_CONTENT_WAIT_MS, IMAGE_LOAD_DELAY_MS, MAX_SCROLL_ITERATIONS,
    POST_SCROLL_DELAY_MS, SCROLL_STEP_PX, SCROLL_TICK_MS, SELECTOR_POLL_INTERVAL_MS,
};

/// Options for rendering one results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Bound on launch, navigation and content extraction individually
    pub timeout: Duration,
    pub user_agent: String,
    /// Sleep `image_delay` after load before extracting
    pub wait_for_images: bool,
    /// Force the lazy-load scroll loop regardless of URL
    pub lazy_scroll: bool,
    /// Extra selectors to wait for, on top of the dynamic-host default
    pub wait_selectors: Vec<String>,
    pub scroll_step_px: u32,
    pub scroll_tick: Duration,
    pub max_scroll_iterations: u32,
    pub image_delay: Duration,
    pub post_scroll_delay: Duration,
    /// Total budget for selector waits; expiry is not an error
    pub dynamic_wait: Duration,
    pub selector_poll: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            user_agent: CHROME_USER_AGENT.to_string(),
            wait_for_images: true,
            lazy_scroll: false,
            wait_selectors: Vec::new(),
            scroll_step_px: SCROLL_STEP_PX,
            scroll_tick: Duration::from_millis(SCROLL_TICK_MS),
            max_scroll_iterations: MAX_SCROLL_ITERATIONS,
            image_delay: Duration::from_millis(IMAGE_LOAD_DELAY_MS),
            post_scroll_delay: Duration::from_millis(POST_SCROLL_DELAY_MS),
            dynamic_wait: Duration::from_millis(DYNAMIC_CONTENT_WAIT_MS),
            selector_poll: Duration::from_millis(SELECTOR_POLL_INTERVAL_MS),
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_lazy_scroll(mut self, lazy_scroll: bool) -> Self {
        self.lazy_scroll = lazy_scroll;
        self
    }

    #[must_use]
    pub fn with_wait_selector(mut self, selector: impl Into<String>) -> Self {
        self.wait_selectors.push(selector.into());
        self
    }

    /// Whether the scroll loop runs for `url`
    #[must_use]
    pub fn scrolls(&self, url: &str) -> bool {
        self.lazy_scroll || is_image_search_url(url)
    }
}

/// Image-search result URLs carry `tbm=isch` or `udm=2` as a query pair
#[must_use]
pub fn is_image_search_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed
        .query_pairs()
        .any(|(key, value)| matches!((key.as_ref(), value.as_ref()), ("tbm", "isch") | ("udm", "2")))
}
