mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use scraper::{Html, Selector};

use stillbrook::audit::{AuditEntry, AuditSink, AuditStatus};
use stillbrook::classifier::{ChannelRules, MatchClassifier, MatchRuleConfig};
use stillbrook::error::{StillbrookError, StillbrookResult};
use stillbrook::orchestrator::{
    NO_RESULTS_MESSAGE, SearchOrchestrator, SearchOutcome, SearchRequest, UserIdentity,
};
use stillbrook::provider::{ProviderPage, SearchResult};
use stillbrook::renderer::{HtmlRenderer, RENDER_FAILED_MESSAGE, RenderOptions};
use stillbrook::sentiment::{LexiconScorer, SentimentThresholds};

use common::{BrokenAuditSink, FakeProvider, MemoryAuditSink, PageReply, results_page};

const PAGE_ONE_URL: &str = "https://serpapi.com/searches/p1/p1.html";
const PAGE_TWO_URL: &str = "https://serpapi.com/searches/p2/p2.html";

/// Serves fixed HTML per URL and records the options each render got
#[derive(Default)]
struct MapRenderer {
    pages: HashMap<String, String>,
    seen: Mutex<Vec<(String, RenderOptions)>>,
}

impl MapRenderer {
    fn with(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }
}

#[async_trait]
impl HtmlRenderer for MapRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> StillbrookResult<String> {
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| StillbrookError::Render(RENDER_FAILED_MESSAGE.to_string()))
    }
}

fn page_one_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new(1, "TechCorp home", "https://www.techcorp.com/"),
        SearchResult::new(2, "TechCorp scam reports", "https://complaints.example.com/tc")
            .with_snippet("Customers report a scam"),
    ]
}

fn page_two_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new(1, "TechCorp forum thread", "https://forum.example.net/tc")
            .with_snippet("Is it a scam?"),
        SearchResult::new(2, "TechCorp on Wikipedia", "https://en.wikipedia.org/wiki/TechCorp"),
    ]
}

fn page(results: Vec<SearchResult>, raw_html_url: Option<&str>) -> PageReply {
    PageReply::Page(ProviderPage {
        results,
        raw_html_url: raw_html_url.map(str::to_string),
        search_id: Some("search-1".into()),
    })
}

fn classifier() -> MatchClassifier {
    MatchClassifier::new(Arc::new(LexiconScorer::new()), SentimentThresholds::default())
}

fn scam_rules() -> MatchRuleConfig {
    MatchRuleConfig {
        negative: ChannelRules::keywords(["scam"]),
        positive: ChannelRules::urls(["techcorp.com"]),
    }
}

fn user() -> UserIdentity {
    UserIdentity::new("user-1").with_email("analyst@example.com")
}

fn orchestrator(
    provider: FakeProvider,
    renderer: MapRenderer,
    sink: Arc<MemoryAuditSink>,
) -> SearchOrchestrator {
    SearchOrchestrator::new(Arc::new(provider), Arc::new(renderer), classifier())
        .with_audit_sink(sink)
}

/// Run one search and wait for its audit write
async fn search(orchestrator: SearchOrchestrator, request: SearchRequest) -> SearchOutcome {
    let outcome = orchestrator.run_search(&user(), request, Instant::now()).await;
    orchestrator.flush_audits().await;
    outcome
}

fn tagged_hrefs(html: &str, class: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!("div.{class} a.zReHs")).unwrap();
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href").map(str::to_string))
        .collect()
}

#[tokio::test]
async fn page_one_failure_is_a_500_with_audit() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new().with_page(0, PageReply::Upstream("Invalid API key"));
    let orchestrator = orchestrator(provider, MapRenderer::default(), Arc::clone(&sink));
    let outcome = search(orchestrator, SearchRequest::new("techcorp")).await;

    assert_eq!(outcome.status_code, 500);
    assert_eq!(
        outcome.response.error.as_deref(),
        Some("Upstream error: Invalid API key")
    );
    let entry = sink.last().unwrap();
    assert_eq!(entry.status, AuditStatus::Error);
    assert_eq!(entry.user_email.as_deref(), Some("analyst@example.com"));
    assert_eq!(entry.error, outcome.response.error);
}

#[tokio::test]
async fn missing_credential_reports_configuration_message() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new().with_page(0, PageReply::MissingKey);
    let orchestrator = orchestrator(provider, MapRenderer::default(), Arc::clone(&sink));
    let outcome = search(orchestrator, SearchRequest::new("techcorp")).await;

    assert_eq!(outcome.status_code, 500);
    assert_eq!(
        outcome.response.error.as_deref(),
        Some("SerpApi key is not configured (set SERPAPI_KEY)")
    );
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn empty_results_are_a_404() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new().with_page(0, page(Vec::new(), Some(PAGE_ONE_URL)));
    let orchestrator = orchestrator(provider, MapRenderer::default(), Arc::clone(&sink));
    let outcome = search(orchestrator, SearchRequest::new("techcorp")).await;

    assert_eq!(outcome.status_code, 404);
    assert_eq!(outcome.response.error.as_deref(), Some(NO_RESULTS_MESSAGE));
    assert_eq!(outcome.response.total_results, Some(0));
    assert_eq!(sink.last().unwrap().status, AuditStatus::NoResults);
}

#[tokio::test]
async fn no_matches_returns_results_and_flag() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new().with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)));
    let renderer = MapRenderer::default().with(PAGE_ONE_URL, results_page(&page_one_results()));
    let request = SearchRequest::new("techcorp").with_rules(MatchRuleConfig {
        negative: ChannelRules::keywords(["lawsuit"]),
        ..MatchRuleConfig::default()
    });

    let outcome = search(orchestrator(provider, renderer, Arc::clone(&sink)), request).await;

    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.response.no_matches, Some(true));
    assert_eq!(outcome.response.total_results, Some(2));
    assert!(outcome.response.matched_results.is_none());
    assert!(outcome.response.html_preview.is_some());
    assert_eq!(sink.last().unwrap().status, AuditStatus::NoResults);
}

#[tokio::test]
async fn each_page_is_highlighted_with_its_own_matches() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new()
        .with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)))
        .with_page(1, page(page_two_results(), Some(PAGE_TWO_URL)));
    let renderer = MapRenderer::default()
        .with(PAGE_ONE_URL, results_page(&page_one_results()))
        .with(PAGE_TWO_URL, results_page(&page_two_results()));
    let request = SearchRequest::new("techcorp")
        .with_rules(scam_rules())
        .with_page_two();

    let outcome = search(orchestrator(provider, renderer, Arc::clone(&sink)), request).await;

    assert_eq!(outcome.status_code, 200);
    let response = &outcome.response;
    assert_eq!(response.no_matches, Some(false));
    assert_eq!(response.total_results, Some(4));
    assert_eq!(response.negative_matches.as_ref().unwrap().len(), 2);
    assert_eq!(response.positive_matches.as_ref().unwrap().len(), 1);
    assert_eq!(response.matched_results.as_ref().unwrap().len(), 3);

    let page_one = response.html_preview.as_deref().unwrap();
    assert_eq!(
        tagged_hrefs(page_one, "stillbrook-negative"),
        vec!["https://complaints.example.com/tc"]
    );
    assert_eq!(
        tagged_hrefs(page_one, "stillbrook-positive"),
        vec!["https://www.techcorp.com/"]
    );

    let page_two = response.page2_html_preview.as_deref().unwrap();
    assert_eq!(
        tagged_hrefs(page_two, "stillbrook-negative"),
        vec!["https://forum.example.net/tc"]
    );
    assert!(tagged_hrefs(page_two, "stillbrook-positive").is_empty());

    let entry = sink.last().unwrap();
    assert_eq!(entry.status, AuditStatus::Success);
    assert_eq!(entry.result_count, 4);
    assert_eq!(entry.negative_count, 2);
    assert_eq!(entry.positive_count, 1);
    assert!(entry.include_page_two);
}

#[tokio::test]
async fn page_two_failure_keeps_page_one() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new()
        .with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)))
        .with_page(1, PageReply::Upstream("rate limited"));
    let renderer = MapRenderer::default().with(PAGE_ONE_URL, results_page(&page_one_results()));
    let request = SearchRequest::new("techcorp")
        .with_rules(scam_rules())
        .with_page_two();

    let outcome = search(orchestrator(provider, renderer, Arc::clone(&sink)), request).await;

    assert_eq!(outcome.status_code, 200);
    assert!(outcome.response.page2_html_preview.is_none());
    assert_eq!(outcome.response.total_results, Some(2));
    assert_eq!(sink.last().unwrap().status, AuditStatus::Success);
}

#[tokio::test]
async fn page_two_is_only_requested_when_asked() {
    let provider = Arc::new(
        FakeProvider::new().with_page(0, page(page_one_results(), Some(PAGE_ONE_URL))),
    );
    let renderer = MapRenderer::default().with(PAGE_ONE_URL, results_page(&page_one_results()));
    let orchestrator = SearchOrchestrator::new(
        Arc::clone(&provider) as Arc<dyn stillbrook::provider::SearchProvider>,
        Arc::new(renderer),
        classifier(),
    );

    orchestrator
        .run_search(&user(), SearchRequest::new("techcorp"), Instant::now())
        .await;

    assert_eq!(provider.recorded_pages(), vec![0]);
}

#[tokio::test]
async fn render_failure_falls_back_to_synthetic_preview() {
    let sink = Arc::new(MemoryAuditSink::default());
    let provider = FakeProvider::new()
        .with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)))
        .with_page(1, page(page_two_results(), None));
    let request = SearchRequest::new("techcorp")
        .with_rules(scam_rules())
        .with_page_two();

    let orchestrator = orchestrator(provider, MapRenderer::default(), Arc::clone(&sink));
    let outcome = search(orchestrator, request).await;

    assert_eq!(outcome.status_code, 200);
    for preview in [
        outcome.response.html_preview.as_deref().unwrap(),
        outcome.response.page2_html_preview.as_deref().unwrap(),
    ] {
        let document = Html::parse_document(preview);
        let negative = Selector::parse(".stillbrook-result.stillbrook-negative").unwrap();
        let positions: Vec<&str> = document
            .select(&negative)
            .filter_map(|e| e.value().attr("data-position"))
            .collect();
        assert_eq!(positions.len(), 1);
        assert!(preview.contains("<mark class=\"stillbrook-keyword\">"));
    }
}

#[tokio::test]
async fn image_searches_render_with_lazy_scroll() {
    let provider = FakeProvider::new().with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)));
    let renderer = Arc::new(MapRenderer::default().with(PAGE_ONE_URL, String::from("<html></html>")));
    let orchestrator = SearchOrchestrator::new(
        Arc::new(provider),
        Arc::clone(&renderer) as Arc<dyn HtmlRenderer>,
        classifier(),
    );

    orchestrator
        .run_search(
            &user(),
            SearchRequest::new("widget").with_result_type("isch"),
            Instant::now(),
        )
        .await;

    let seen = renderer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].1.lazy_scroll);
}

#[tokio::test]
async fn audit_sink_failure_does_not_change_the_response() {
    let provider = FakeProvider::new().with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)));
    let renderer = MapRenderer::default().with(PAGE_ONE_URL, results_page(&page_one_results()));
    let orchestrator = SearchOrchestrator::new(Arc::new(provider), Arc::new(renderer), classifier())
        .with_audit_sink(Arc::new(BrokenAuditSink));

    let outcome = orchestrator
        .run_search(
            &user(),
            SearchRequest::new("techcorp").with_rules(scam_rules()),
            Instant::now(),
        )
        .await;

    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.audit_entry.status, AuditStatus::Success);
    assert_eq!(outcome.audit_entry.matched_count, 2);
}

/// Sink that takes a while to accept each entry
#[derive(Default)]
struct SlowAuditSink {
    inner: MemoryAuditSink,
}

#[async_trait]
impl AuditSink for SlowAuditSink {
    async fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        self.inner.record(entry).await
    }
}

#[tokio::test]
async fn slow_audit_sink_does_not_delay_the_response() {
    let sink = Arc::new(SlowAuditSink::default());
    let provider = FakeProvider::new().with_page(0, page(page_one_results(), Some(PAGE_ONE_URL)));
    let renderer = MapRenderer::default().with(PAGE_ONE_URL, results_page(&page_one_results()));
    let orchestrator = SearchOrchestrator::new(Arc::new(provider), Arc::new(renderer), classifier())
        .with_audit_sink(Arc::clone(&sink) as Arc<dyn AuditSink>);

    let started = Instant::now();
    let outcome = orchestrator
        .run_search(&user(), SearchRequest::new("techcorp"), started)
        .await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.status_code, 200);
    assert!(elapsed < Duration::from_millis(500), "response took {elapsed:?}");
    assert_eq!(sink.inner.len(), 0);

    orchestrator.flush_audits().await;
    assert_eq!(sink.inner.len(), 1);
    assert_eq!(sink.inner.last().unwrap().id, outcome.audit_entry.id);
}
