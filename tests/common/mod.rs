//! Fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use stillbrook::audit::{AuditEntry, AuditSink};
use stillbrook::error::{StillbrookError, StillbrookResult};
use stillbrook::provider::{ProviderPage, SearchProvider, SearchQuery, SearchResult};
use stillbrook::renderer::{BrowserLauncher, BrowserSession, FallbackFetcher, RenderOptions};

/// Minimal Google-style results page with one container per result
pub fn results_page(results: &[SearchResult]) -> String {
    let mut body = String::new();
    for r in results {
        body.push_str(&format!(
            r#"<div class="MjjYud"><div class="g"><a class="zReHs" href="{}"><h3>{}</h3></a><div class="VwiC3b">{}</div></div></div>"#,
            html_escape::encode_double_quoted_attribute(&r.link),
            html_escape::encode_text(&r.title),
            html_escape::encode_text(&r.snippet),
        ));
    }
    format!(
        "<!DOCTYPE html><html><head><title>results</title></head><body><div id=\"search\">{body}</div></body></html>"
    )
}

/// Render options with every wait shortened for tests
pub fn fast_options() -> RenderOptions {
    RenderOptions {
        timeout: Duration::from_millis(500),
        image_delay: Duration::ZERO,
        post_scroll_delay: Duration::ZERO,
        dynamic_wait: Duration::from_millis(30),
        selector_poll: Duration::from_millis(5),
        scroll_tick: Duration::from_millis(1),
        ..RenderOptions::default()
    }
}

/// What the fake provider answers for one page index
#[derive(Clone)]
pub enum PageReply {
    Page(ProviderPage),
    Upstream(&'static str),
    MissingKey,
}

/// Serves canned pages keyed by page index and records queries
#[derive(Default)]
pub struct FakeProvider {
    replies: Mutex<Vec<(u32, PageReply)>>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, reply: PageReply) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .push((page, reply));
        self
    }

    pub fn recorded_pages(&self) -> Vec<u32> {
        self.queries
            .lock()
            .expect("queries lock")
            .iter()
            .map(|q| q.page)
            .collect()
    }
}

#[async_trait]
impl SearchProvider for FakeProvider {
    async fn fetch(&self, query: &SearchQuery) -> StillbrookResult<ProviderPage> {
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .iter()
            .find(|(p, _)| *p == query.page)
            .map(|(_, r)| r.clone());
        match reply {
            Some(PageReply::Page(page)) => Ok(page),
            Some(PageReply::Upstream(msg)) => Err(StillbrookError::Upstream(msg.to_string())),
            Some(PageReply::MissingKey) => Err(StillbrookError::Configuration(
                "SerpApi key is not configured (set SERPAPI_KEY)".to_string(),
            )),
            None => Ok(ProviderPage::default()),
        }
    }
}

/// Where a fake browser session should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFailure {
    #[default]
    None,
    Launch,
    Navigate,
    Content,
    /// Navigation never finishes
    HangNavigate,
    /// Page work succeeds, teardown errors
    Close,
}

/// Counters shared between a launcher and the sessions it starts
#[derive(Debug, Default)]
pub struct SessionStats {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub selector_checks: AtomicUsize,
    pub navigated: Mutex<Vec<String>>,
}

pub struct FakeLauncher {
    pub html: String,
    pub failure: SessionFailure,
    /// Scroll steps before the fake page reports its bottom
    pub page_height_steps: usize,
    pub selector_present: bool,
    /// Teardown errors on top of `failure`
    pub close_fails: bool,
    pub stats: Arc<SessionStats>,
}

impl FakeLauncher {
    pub fn serving(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            failure: SessionFailure::None,
            page_height_steps: 3,
            selector_present: true,
            close_fails: false,
            stats: Arc::new(SessionStats::default()),
        }
    }

    pub fn failing(failure: SessionFailure) -> Self {
        Self {
            failure,
            ..Self::serving("")
        }
    }

    pub fn without_selector(mut self) -> Self {
        self.selector_present = false;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _options: &RenderOptions) -> Result<Box<dyn BrowserSession>> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        if self.failure == SessionFailure::Launch {
            return Err(anyhow!("Failed to launch browser: no executable"));
        }
        Ok(Box::new(FakeSession {
            html: self.html.clone(),
            failure: self.failure,
            remaining_steps: self.page_height_steps,
            selector_present: self.selector_present,
            close_fails: self.close_fails || self.failure == SessionFailure::Close,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct FakeSession {
    html: String,
    failure: SessionFailure,
    remaining_steps: usize,
    selector_present: bool,
    close_fails: bool,
    stats: Arc<SessionStats>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.stats
            .navigated
            .lock()
            .expect("navigated lock")
            .push(url.to_string());
        match self.failure {
            SessionFailure::Navigate => Err(anyhow!("net::ERR_NAME_NOT_RESOLVED")),
            SessionFailure::HangNavigate => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn has_selector(&mut self, _selector: &str) -> bool {
        self.stats.selector_checks.fetch_add(1, Ordering::SeqCst);
        self.selector_present
    }

    async fn scroll_by(&mut self, _pixels: u32) -> Result<bool> {
        self.stats.scrolls.fetch_add(1, Ordering::SeqCst);
        self.remaining_steps = self.remaining_steps.saturating_sub(1);
        Ok(self.remaining_steps == 0)
    }

    async fn content(&mut self) -> Result<String> {
        if self.failure == SessionFailure::Content {
            return Err(anyhow!("Failed to get page content"));
        }
        Ok(self.html.clone())
    }

    async fn close(&mut self) -> Result<()> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        if self.close_fails {
            return Err(anyhow!("Browser close failed: connection closed"));
        }
        Ok(())
    }
}

/// Returns a fixed body (or fails) and records the URLs it was asked for
pub struct FakeFetcher {
    body: Option<String>,
    pub urls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn returning(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            body: None,
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl FallbackFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.urls.lock().expect("urls lock").push(url.to_string());
        self.body
            .clone()
            .ok_or_else(|| anyhow!("Fallback fetch returned 503 Service Unavailable"))
    }
}

/// Keeps recorded audit entries in memory
#[derive(Default)]
pub struct MemoryAuditSink {
    pub entries: Mutex<VecDeque<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn last(&self) -> Option<AuditEntry> {
        self.entries.lock().expect("entries lock").back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("entries lock").len()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .expect("entries lock")
            .push_back(entry.clone());
        Ok(())
    }
}

/// Sink that always fails
pub struct BrokenAuditSink;

#[async_trait]
impl AuditSink for BrokenAuditSink {
    async fn record(&self, _entry: &AuditEntry) -> Result<()> {
        Err(anyhow!("audit store unavailable"))
    }
}
