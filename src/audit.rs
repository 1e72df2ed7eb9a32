//! Audit records for search runs
//!
//! Every `run_search` call produces one [`AuditEntry`], whatever the outcome.
//! Where it goes is up to the [`AuditSink`]; sink failures are logged and
//! never change the response.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::provider::SearchQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Error,
    NoResults,
}

impl AuditStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Error => "error",
            AuditStatus::NoResults => "no_results",
        }
    }
}

/// One search run as recorded for auditing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_email: Option<String>,
    pub query: SearchQuery,
    pub include_page_two: bool,
    pub result_count: usize,
    pub matched_count: usize,
    pub negative_count: usize,
    pub positive_count: usize,
    pub status: AuditStatus,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Receives audit entries
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> anyhow::Result<()>;
}

/// Writes entries as structured events on the `stillbrook::audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        let record = serde_json::to_string(entry)?;
        info!(
            target: "stillbrook::audit",
            id = %entry.id,
            user = %entry.user_id,
            keyword = %entry.query.keyword,
            status = entry.status.as_str(),
            results = entry.result_count,
            matched = entry.matched_count,
            duration_ms = entry.duration_ms,
            record = %record,
            "Search audited"
        );
        Ok(())
    }
}
