//! Data structures shared by providers and the rest of the pipeline

use serde::{Deserialize, Serialize};

use crate::selectors::ResultType;

/// A single search result from one provider page
///
/// `link` is the identity of a result. `position` is only unique within
/// the page it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Result ranking on its page (1-indexed)
    pub position: u32,

    /// Result title
    pub title: String,

    /// Absolute URL of the result
    pub link: String,

    /// Description snippet, may be empty
    #[serde(default)]
    pub snippet: String,

    /// Site name or news/shopping source label, may be empty
    #[serde(default)]
    pub displayed_source: String,

    /// Alternate URL some providers attach (tracking redirect)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_link: Option<String>,

    /// Thumbnail URL for image, video and shopping results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SearchResult {
    /// Minimal constructor used by providers and tests
    #[must_use]
    pub fn new(position: u32, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            link: link.into(),
            snippet: String::new(),
            displayed_source: String::new(),
            redirect_link: None,
            thumbnail: None,
        }
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    #[must_use]
    pub fn with_redirect_link(mut self, redirect: impl Into<String>) -> Self {
        self.redirect_link = Some(redirect.into());
        self
    }

    #[must_use]
    pub fn with_displayed_source(mut self, source: impl Into<String>) -> Self {
        self.displayed_source = source.into();
        self
    }

    /// Links to try when locating this result, primary first
    pub fn candidate_links(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.link.as_str())
            .chain(self.redirect_link.as_deref())
            .filter(|l| !l.is_empty())
    }
}

/// Parameters for fetching one page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub keyword: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Provider search domain, e.g. `google.co.uk`
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub result_type: ResultType,
    #[serde(default)]
    pub country_code: Option<String>,
    /// Zero-based page index
    #[serde(default)]
    pub page: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: None,
            domain: None,
            language: None,
            result_type: ResultType::Web,
            country_code: None,
            page: 0,
        }
    }

    /// Same query, different zero-based page
    #[must_use]
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// One fetched page of results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPage {
    pub results: Vec<SearchResult>,
    /// Provider-hosted snapshot of the rendered results page
    #[serde(default)]
    pub raw_html_url: Option<String>,
    #[serde(default)]
    pub search_id: Option<String>,
}
