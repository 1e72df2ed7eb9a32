//! Shared configuration constants for stillbrook
//!
//! Default values used across the provider, renderer and classifier so the
//! tuning numbers live in one place.

/// SerpApi JSON search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://serpapi.com/search.json";

/// Timeout for a single provider request
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Results per provider page; page N starts at offset `N * RESULTS_PER_PAGE`
pub const RESULTS_PER_PAGE: u32 = 10;

/// Default interface language sent to the provider
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default country code sent to the provider
pub const DEFAULT_COUNTRY_CODE: &str = "us";

/// Sentiment score at or below which a result joins the negative channel
pub const NEGATIVE_SENTIMENT_THRESHOLD: i32 = -2;

/// Sentiment score at or above which a result joins the positive channel
pub const POSITIVE_SENTIMENT_THRESHOLD: i32 = 2;

/// Chrome user agent string for rendering provider snapshots
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Desktop viewport used for rendering
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;

/// Navigation and extraction timeout for one render
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Upper bound on waiting for injected result nodes
pub const DYNAMIC_CONTENT_WAIT_MS: u64 = 10_000;

/// Poll interval while waiting for a selector
pub const SELECTOR_POLL_INTERVAL_MS: u64 = 200;

/// Delay after load before extraction when waiting for images
pub const IMAGE_LOAD_DELAY_MS: u64 = 2_000;

/// Lazy-load scroll step in pixels
pub const SCROLL_STEP_PX: u32 = 400;

/// Delay between scroll steps
pub const SCROLL_TICK_MS: u64 = 100;

/// Hard cap on scroll iterations for pages that keep growing
pub const MAX_SCROLL_ITERATIONS: u32 = 60;

/// Flat delay after the scroll loop so the last images can resolve
pub const POST_SCROLL_DELAY_MS: u64 = 1_500;

/// Selector the provider snapshot injects once results are materialised
pub const PRIMARY_CONTENT_SELECTOR: &str = "#search";

/// Host fragments whose snapshots build their result nodes client-side
pub const DYNAMIC_RESULT_HOSTS: &[&str] = &["serpapi.com/searches", "google.com/search"];

/// Element id of the injected highlight stylesheet
pub const HIGHLIGHT_STYLE_ID: &str = "stillbrook-highlight-styles";

/// Class applied to negative matches
pub const NEGATIVE_CLASS: &str = "stillbrook-negative";

/// Class applied to positive matches
pub const POSITIVE_CLASS: &str = "stillbrook-positive";
