//! Outbound response shape

use serde::{Deserialize, Serialize};

use crate::audit::AuditEntry;
use crate::provider::SearchResult;

/// JSON body returned to the request handler; absent fields are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_results: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_matches: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_matches: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page2_html_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_matches: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Status, body and audit record of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub status_code: u16,
    pub response: SearchResponse,
    pub audit_entry: AuditEntry,
}

impl SearchOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
