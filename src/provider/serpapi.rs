//! SerpApi client
//!
//! Fetches one page of Google results as JSON and maps the vertical the
//! caller asked for into [`SearchResult`] records. Also returns the
//! provider-hosted HTML snapshot URL the renderer later materialises.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::SearchProvider;
use super::types::{ProviderPage, SearchQuery, SearchResult};
use crate::config::StillbrookConfig;
use crate::error::{StillbrookError, StillbrookResult};
use crate::selectors::ResultType;
use crate::utils::{RESULTS_PER_PAGE, truncate_for_log};

/// Client for the SerpApi Google engine
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    default_language: String,
    default_country_code: String,
}

#[derive(Debug, Default, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    search_metadata: Option<SearchMetadata>,
    #[serde(default)]
    organic_results: Vec<SerpApiItem>,
    #[serde(default)]
    news_results: Vec<SerpApiItem>,
    #[serde(default)]
    shopping_results: Vec<SerpApiItem>,
    #[serde(default)]
    video_results: Vec<SerpApiItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchMetadata {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    raw_html_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SerpApiItem {
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    product_link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    /// String for organic/shopping, `{ "name": ... }` object for news
    #[serde(default)]
    source: Option<Value>,
    #[serde(default)]
    displayed_link: Option<String>,
    #[serde(default)]
    redirect_link: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl SerpApiProvider {
    /// Build a provider from process configuration
    ///
    /// A missing key is accepted here and reported on `fetch`, so that the
    /// failure reaches the audit trail of the request that hit it.
    pub fn from_config(config: &StillbrookConfig) -> StillbrookResult<Self> {
        let http_client = Client::builder()
            .timeout(config.provider_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.serpapi_key().map(str::to_string),
            base_url: config.search_url().to_string(),
            default_language: config.default_language().to_string(),
            default_country_code: config.default_country_code().to_string(),
        })
    }

    /// Sets a custom base URL for the API (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn query_params(&self, query: &SearchQuery, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", "google".to_string()),
            ("q", query.keyword.trim().to_string()),
            (
                "hl",
                query.language.clone().unwrap_or_else(|| self.default_language.clone()),
            ),
            (
                "gl",
                query
                    .country_code
                    .clone()
                    .unwrap_or_else(|| self.default_country_code.clone()),
            ),
            ("start", (query.page * RESULTS_PER_PAGE).to_string()),
        ];
        if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
            params.push(("location", location.to_string()));
        }
        if let Some(domain) = query.domain.as_deref().filter(|d| !d.trim().is_empty()) {
            params.push(("google_domain", domain.to_string()));
        }
        if let Some(tbm) = query.result_type.tbm() {
            params.push(("tbm", tbm.to_string()));
        }
        params.push(("api_key", api_key.to_string()));
        params
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    #[instrument(skip(self, query), fields(keyword = %query.keyword, page = query.page, result_type = ?query.result_type))]
    async fn fetch(&self, query: &SearchQuery) -> StillbrookResult<ProviderPage> {
        if query.keyword.trim().is_empty() {
            return Err(StillbrookError::InvalidInput(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        let Some(api_key) = self.api_key.as_deref() else {
            error!("SerpApi key is not configured");
            return Err(StillbrookError::Configuration(
                "SerpApi key is not configured (set SERPAPI_KEY)".to_string(),
            ));
        };

        let params = self.query_params(query, api_key);
        debug!(url = %self.base_url, "Sending search request to SerpApi");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Network error during SerpApi request");
                StillbrookError::Upstream(format!("Search provider request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "SerpApi error status");
            return Err(StillbrookError::Upstream(format!(
                "Search provider returned {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(|e| {
            StillbrookError::Upstream(format!("Failed to read search provider response: {e}"))
        })?;
        let payload: SerpApiResponse = serde_json::from_str(&body)?;

        if let Some(message) = payload.error {
            error!(error = %message, "SerpApi payload carried an error");
            return Err(StillbrookError::Upstream(message));
        }

        let page = into_page(payload, query.result_type);
        info!(
            result_count = page.results.len(),
            has_raw_html = page.raw_html_url.is_some(),
            "Search page fetched"
        );
        Ok(page)
    }
}

fn into_page(payload: SerpApiResponse, result_type: ResultType) -> ProviderPage {
    let (label, items) = match result_type {
        ResultType::News => ("news_results", payload.news_results),
        ResultType::Shopping => ("shopping_results", payload.shopping_results),
        ResultType::Videos => ("video_results", payload.video_results),
        ResultType::Web | ResultType::Images => ("organic_results", payload.organic_results),
    };

    if items.is_empty() {
        warn!(array = label, ?result_type, "Provider returned no items for requested result type");
    }

    let results = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| map_item(index, item))
        .collect();

    let metadata = payload.search_metadata.unwrap_or_default();
    ProviderPage {
        results,
        raw_html_url: metadata.raw_html_file,
        search_id: metadata.id,
    }
}

fn map_item(index: usize, item: SerpApiItem) -> Option<SearchResult> {
    let Some(link) = item.link.or(item.product_link).filter(|l| !l.is_empty()) else {
        warn!(index, title = ?item.title, "Dropping provider item without a link");
        return None;
    };

    let displayed_source = match item.source {
        Some(Value::String(s)) => s,
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => item.displayed_link.unwrap_or_default(),
    };

    let position = item
        .position
        .filter(|p| *p >= 1)
        .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX));

    Some(SearchResult {
        position,
        title: item.title.unwrap_or_default(),
        link,
        snippet: item.snippet.unwrap_or_default(),
        displayed_source,
        redirect_link: item.redirect_link.filter(|l| !l.is_empty()),
        thumbnail: item.thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SerpApiResponse {
        serde_json::from_value(value).expect("fixture parses")
    }

    #[test]
    fn organic_items_map_with_defaults() {
        let payload = parse(json!({
            "search_metadata": { "id": "abc", "raw_html_file": "https://serpapi.com/searches/abc/abc.html" },
            "organic_results": [
                { "position": 1, "title": "One", "link": "https://one.com/", "snippet": "first", "source": "One Inc" },
                { "title": "Two", "link": "https://two.com/", "displayed_link": "two.com › docs" }
            ]
        }));

        let page = into_page(payload, ResultType::Web);
        assert_eq!(page.search_id.as_deref(), Some("abc"));
        assert_eq!(page.raw_html_url.as_deref(), Some("https://serpapi.com/searches/abc/abc.html"));
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].displayed_source, "One Inc");
        assert_eq!(page.results[1].position, 2);
        assert_eq!(page.results[1].displayed_source, "two.com › docs");
        assert!(page.results[1].snippet.is_empty());
    }

    #[test]
    fn news_source_object_is_flattened() {
        let payload = parse(json!({
            "news_results": [
                { "position": 1, "title": "Story", "link": "https://news.example.com/a", "source": { "name": "Daily Planet", "icon": "x.png" } }
            ]
        }));
        let page = into_page(payload, ResultType::News);
        assert_eq!(page.results[0].displayed_source, "Daily Planet");
        assert!(page.raw_html_url.is_none());
    }

    #[test]
    fn shopping_falls_back_to_product_link_and_drops_linkless() {
        let payload = parse(json!({
            "shopping_results": [
                { "position": 1, "title": "Widget", "product_link": "https://shop.example.com/w", "source": "Shop" },
                { "position": 2, "title": "Ghost" }
            ]
        }));
        let page = into_page(payload, ResultType::Shopping);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].link, "https://shop.example.com/w");
    }

    #[test]
    fn wrong_vertical_yields_empty_page() {
        let payload = parse(json!({
            "organic_results": [{ "position": 1, "title": "One", "link": "https://one.com/" }]
        }));
        assert!(into_page(payload, ResultType::Videos).results.is_empty());
    }
}
