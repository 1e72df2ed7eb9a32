//! Search result monitoring: fetch a results page, classify results into
//! negative and positive matches, and return the page with those matches
//! highlighted in place.

pub mod audit;
pub mod browser_setup;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod highlight;
pub mod orchestrator;
pub mod provider;
pub mod renderer;
pub mod selectors;
pub mod sentiment;
pub mod utils;

pub use audit::{AuditEntry, AuditSink, AuditStatus, TracingAuditSink};
pub use browser_setup::{
    LaunchSettings, apply_stealth_measures, download_managed_browser, find_browser_executable,
    launch_browser,
};
pub use classifier::{ChannelRules, MatchClassifier, MatchRuleConfig, MatchSet, Polarity};
pub use config::{StillbrookConfig, StillbrookConfigBuilder};
pub use error::{StillbrookError, StillbrookResult};
pub use highlight::{HighlightReport, Highlighter, KeywordHighlight};
pub use orchestrator::{SearchOrchestrator, SearchOutcome, SearchRequest, SearchResponse, UserIdentity};
pub use provider::{ProviderPage, SearchProvider, SearchQuery, SearchResult, SerpApiProvider};
pub use renderer::{
    BrowserLauncher, BrowserSession, ChromiumLauncher, FallbackFetcher, HtmlRenderer, PageRenderer,
    RenderOptions, ReqwestFetcher,
};
pub use selectors::ResultType;
pub use sentiment::{LexiconScorer, SentimentScorer, SentimentThresholds};
