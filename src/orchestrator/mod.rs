//! Search run orchestration
//!
//! One call fetches page 1 (and page 2 when asked), classifies the combined
//! results, renders and highlights each page against only that page's
//! matches, and returns the response together with an audit entry.

mod request;
mod response;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditSink, AuditStatus};
use crate::classifier::{DedupKey, MatchClassifier, MatchSet};
use crate::highlight::{Highlighter, KeywordHighlight, build_preview};
use crate::provider::{ProviderPage, SearchProvider, SearchResult};
use crate::renderer::{HtmlRenderer, RenderOptions};
use crate::selectors::ResultType;

pub use request::{SearchRequest, UserIdentity};
pub use response::{SearchOutcome, SearchResponse};

/// Message returned with the 404 outcome
pub const NO_RESULTS_MESSAGE: &str = "No results found for this search";

/// Runs searches end to end; cheap to share behind an `Arc`
pub struct SearchOrchestrator {
    provider: Arc<dyn SearchProvider>,
    renderer: Arc<dyn HtmlRenderer>,
    classifier: MatchClassifier,
    highlighter: Highlighter,
    render_options: RenderOptions,
    audit_sink: Option<Arc<dyn AuditSink>>,
    /// Detached audit writes not yet joined
    pending_audits: Mutex<Vec<JoinHandle<()>>>,
}

/// Counts that go into the audit entry
#[derive(Debug, Clone, Copy, Default)]
struct RunCounts {
    results: usize,
    matched: usize,
    negative: usize,
    positive: usize,
}

impl SearchOrchestrator {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        renderer: Arc<dyn HtmlRenderer>,
        classifier: MatchClassifier,
    ) -> Self {
        Self {
            provider,
            renderer,
            classifier,
            highlighter: Highlighter::new(),
            render_options: RenderOptions::default(),
            audit_sink: None,
            pending_audits: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Run one search for `user`; `started` is when the request arrived
    pub async fn run_search(
        &self,
        user: &UserIdentity,
        request: SearchRequest,
        started: Instant,
    ) -> SearchOutcome {
        let query = request.to_query();
        let result_type = query.result_type;
        info!(
            user = %user.id,
            keyword = %query.keyword,
            result_type = ?result_type,
            page_two = request.include_page_two,
            "Starting search"
        );

        let page_one = match self.provider.fetch(&query).await {
            Ok(page) => page,
            Err(e) => {
                let message = e.audit_message();
                error!(error = %e, "Fetching first results page failed");
                return self
                    .finish(
                        user,
                        &request,
                        started,
                        500,
                        SearchResponse::error(message.clone()),
                        AuditStatus::Error,
                        Some(message),
                        RunCounts::default(),
                    )
                    .await;
            }
        };

        let page_two = if request.include_page_two {
            match self.provider.fetch(&query.for_page(1)).await {
                Ok(page) => Some(page),
                Err(e) => {
                    warn!(error = %e, "Fetching second results page failed, continuing with page 1");
                    None
                }
            }
        } else {
            None
        };

        let combined: Vec<SearchResult> = page_one
            .results
            .iter()
            .chain(page_two.iter().flat_map(|p| p.results.iter()))
            .cloned()
            .collect();

        if combined.is_empty() {
            info!(keyword = %query.keyword, "Provider returned no results");
            let response = SearchResponse {
                total_results: Some(0),
                search_id: page_one.search_id.clone(),
                ..SearchResponse::error(NO_RESULTS_MESSAGE)
            };
            return self
                .finish(
                    user,
                    &request,
                    started,
                    404,
                    response,
                    AuditStatus::NoResults,
                    Some(NO_RESULTS_MESSAGE.to_string()),
                    RunCounts::default(),
                )
                .await;
        }

        let matches = self.classifier.classify(&combined, &request.rules);
        let keywords = if request.highlight_keywords {
            KeywordHighlight::from_rules(&request.rules)
        } else {
            KeywordHighlight::default()
        };

        let html_preview = self
            .render_page(&page_one, 1, &matches, result_type, &keywords, &query.keyword)
            .await;
        let page2_html_preview = match &page_two {
            Some(page) if !page.results.is_empty() => Some(
                self.render_page(page, 2, &matches, result_type, &keywords, &query.keyword)
                    .await,
            ),
            _ => None,
        };

        let counts = RunCounts {
            results: combined.len(),
            matched: matches.all.len(),
            negative: matches.negative.len(),
            positive: matches.positive.len(),
        };
        let total_results = combined.len();
        let search_id = page_one.search_id.clone();

        if matches.is_empty() {
            let response = SearchResponse {
                results: Some(combined),
                html_preview: Some(html_preview),
                page2_html_preview,
                total_results: Some(total_results),
                no_matches: Some(true),
                search_id,
                ..SearchResponse::default()
            };
            return self
                .finish(user, &request, started, 200, response, AuditStatus::NoResults, None, counts)
                .await;
        }

        let MatchSet {
            negative,
            positive,
            all,
        } = matches;
        let response = SearchResponse {
            matched_results: Some(all),
            negative_matches: Some(negative),
            positive_matches: Some(positive),
            results: Some(combined),
            html_preview: Some(html_preview),
            page2_html_preview,
            total_results: Some(total_results),
            no_matches: Some(false),
            search_id,
            error: None,
        };
        self.finish(user, &request, started, 200, response, AuditStatus::Success, None, counts)
            .await
    }

    /// Rendered and highlighted HTML for one page, or the synthetic preview
    async fn render_page(
        &self,
        page: &ProviderPage,
        page_number: u32,
        matches: &MatchSet,
        result_type: ResultType,
        keywords: &KeywordHighlight,
        keyword: &str,
    ) -> String {
        let negative = matches_on_page(&matches.negative, &page.results);
        let positive = matches_on_page(&matches.positive, &page.results);
        debug!(
            page = page_number,
            negative = negative.len(),
            positive = positive.len(),
            "Matches attributed to page"
        );

        if let Some(url) = page.raw_html_url.as_deref() {
            let options = self
                .render_options
                .clone()
                .with_lazy_scroll(self.render_options.lazy_scroll || result_type == ResultType::Images);
            match self.renderer.render(url, &options).await {
                Ok(html) => {
                    let (highlighted, _) =
                        self.highlighter
                            .apply(&html, &negative, &positive, result_type, keywords);
                    return highlighted;
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "Rendering failed, using synthetic preview");
                }
            }
        } else {
            debug!(page = page_number, "No raw HTML snapshot, using synthetic preview");
        }

        let negative_positions: Vec<u32> = negative.iter().map(|r| r.position).collect();
        let positive_positions: Vec<u32> = positive.iter().map(|r| r.position).collect();
        build_preview(
            &page.results,
            &negative_positions,
            &positive_positions,
            Some(keyword),
            result_type == ResultType::Images,
        )
    }

    /// Record `entry` on a detached task so the response never waits on the sink
    fn spawn_audit(&self, sink: Arc<dyn AuditSink>, entry: AuditEntry) {
        let write = async move {
            if let Err(e) = sink.record(&entry).await {
                warn!(error = %e, audit_id = %entry.id, "Failed to record audit entry");
            }
        };
        let handle = tokio::spawn(write);
        if let Ok(mut pending) = self.pending_audits.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Wait for every audit write spawned so far.
    ///
    /// Writes outlive the orchestrator, but not the runtime: call this
    /// before process exit.
    pub async fn flush_audits(&self) {
        let pending = match self.pending_audits.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return,
        };
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Audit task failed");
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish(
        &self,
        user: &UserIdentity,
        request: &SearchRequest,
        started: Instant,
        status_code: u16,
        response: SearchResponse,
        status: AuditStatus,
        error: Option<String>,
        counts: RunCounts,
    ) -> SearchOutcome {
        let audit_entry = AuditEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            query: request.to_query(),
            include_page_two: request.include_page_two,
            result_count: counts.results,
            matched_count: counts.matched,
            negative_count: counts.negative,
            positive_count: counts.positive,
            status,
            error,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        if let Some(sink) = &self.audit_sink {
            self.spawn_audit(Arc::clone(sink), audit_entry.clone());
        }

        info!(
            status_code,
            status = status.as_str(),
            duration_ms = audit_entry.duration_ms,
            "Search finished"
        );

        SearchOutcome {
            status_code,
            response,
            audit_entry,
        }
    }
}

/// Matches that belong to `page`, by link or (for link-less results) position
fn matches_on_page(matches: &[SearchResult], page: &[SearchResult]) -> Vec<SearchResult> {
    let keys: HashSet<DedupKey> = page.iter().map(DedupKey::of).collect();
    matches
        .iter()
        .filter(|m| keys.contains(&DedupKey::of(m)))
        .cloned()
        .collect()
}
