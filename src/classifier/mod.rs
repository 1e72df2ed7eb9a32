//! Negative/positive match classification
//!
//! Each channel runs up to three rules (URL, keyword, sentiment) against the
//! same result list. A result may match both channels; resolving that is the
//! highlighter's job, not ours.

mod dedup;
mod rules;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{self, host_matches};
use crate::provider::SearchResult;
use crate::sentiment::{SentimentScorer, SentimentThresholds};

pub use dedup::{DedupKey, dedup};
pub use rules::{ChannelRules, MatchRuleConfig};

/// Which channel a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Negative => "negative",
            Polarity::Positive => "positive",
        }
    }
}

/// Classification output; `all` is negative ∪ positive, negatives first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    pub negative: Vec<SearchResult>,
    pub positive: Vec<SearchResult>,
    pub all: Vec<SearchResult>,
}

impl MatchSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Applies channel rules to provider results
#[derive(Clone)]
pub struct MatchClassifier {
    scorer: Arc<dyn SentimentScorer>,
    thresholds: SentimentThresholds,
}

impl std::fmt::Debug for MatchClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchClassifier")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

impl MatchClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>, thresholds: SentimentThresholds) -> Self {
        Self { scorer, thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> SentimentThresholds {
        self.thresholds
    }

    pub fn classify(&self, results: &[SearchResult], config: &MatchRuleConfig) -> MatchSet {
        let negative = self.classify_channel(results, &config.negative, Polarity::Negative);
        let positive = self.classify_channel(results, &config.positive, Polarity::Positive);
        let all = dedup(negative.iter().chain(positive.iter()).cloned());

        debug!(
            total = results.len(),
            negative = negative.len(),
            positive = positive.len(),
            "Classified search results"
        );

        MatchSet {
            negative,
            positive,
            all,
        }
    }

    fn classify_channel(
        &self,
        results: &[SearchResult],
        rules: &ChannelRules,
        polarity: Polarity,
    ) -> Vec<SearchResult> {
        let mut matched: Vec<SearchResult> = Vec::new();

        if rules.enable_urls && !rules.urls.is_empty() {
            let domains = rule_domains(&rules.urls, polarity);
            if !domains.is_empty() {
                matched.extend(
                    results
                        .iter()
                        .filter(|r| link_matches_any(r, &domains))
                        .cloned(),
                );
            }
        }

        let keywords: Vec<String> = rules
            .active_keywords()
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect();
        if !keywords.is_empty() {
            matched.extend(
                results
                    .iter()
                    .filter(|r| {
                        let haystack = format!("{} {}", r.title, r.snippet).to_lowercase();
                        keywords.iter().any(|k| haystack.contains(k.as_str()))
                    })
                    .cloned(),
            );
        }

        if rules.enable_sentiment {
            matched.extend(
                results
                    .iter()
                    .filter(|r| self.sentiment_fires(r, polarity))
                    .cloned(),
            );
        }

        dedup(matched)
    }

    fn sentiment_fires(&self, result: &SearchResult, polarity: Polarity) -> bool {
        let text = if result.snippet.trim().is_empty() {
            result.title.as_str()
        } else {
            result.snippet.as_str()
        };
        if text.trim().is_empty() {
            return false;
        }
        let score = self.scorer.score(text);
        match polarity {
            Polarity::Negative => self.thresholds.is_negative(score),
            Polarity::Positive => self.thresholds.is_positive(score),
        }
    }
}

fn rule_domains(urls: &[String], polarity: Polarity) -> Vec<String> {
    urls.iter()
        .filter(|u| !u.trim().is_empty())
        .filter_map(|u| match domain::normalize(u) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!(channel = polarity.as_str(), url = %u, error = %e, "Skipping invalid rule URL");
                None
            }
        })
        .collect()
}

fn link_matches_any(result: &SearchResult, domains: &[String]) -> bool {
    if result.link.is_empty() {
        return false;
    }
    match domain::normalize(&result.link) {
        Ok(host) => domains.iter().any(|d| host_matches(&host, d)),
        Err(e) => {
            warn!(link = %result.link, error = %e, "Skipping result with malformed link");
            false
        }
    }
}
