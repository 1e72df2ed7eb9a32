//! In-place highlighting of matched results in rendered markup
//!
//! Negative matches are applied before positive ones so a result in both
//! channels ends up negative. Web-style results go through the locating
//! cascade in [`locate`]; image and shopping results are wrapped directly
//! (see [`typed`]). A match that cannot be found is logged and skipped.

pub mod keyword;
pub mod locate;
pub mod preview;
pub mod scanner;
pub mod styles;
pub mod typed;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::classifier::Polarity;
use crate::provider::SearchResult;
use crate::selectors::{HighlightSelectorSet, ResultType, selectors_for};
use crate::utils::truncate_for_log;

pub use keyword::KeywordHighlight;
pub use locate::{
    AnchorHref, DataResultIndex, DomainAndHref, HrefWithLinkClass, LocateContext,
    LocateStrategy, TagOutcome, default_strategies,
};
pub use preview::{build_preview, mark_keyword};
pub use styles::{inject_styles, stylesheet};

use locate::{Resolution, resolve_container, tag_container};
use scanner::scan_tags;

/// Counts from one `apply` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightReport {
    pub tagged: usize,
    /// Negative replaced an existing positive tag
    pub overwritten: usize,
    pub already_tagged: usize,
    /// Positive matches left alone because the container is negative
    pub conflicts: usize,
    pub unlocated: usize,
    pub keyword_tagged: usize,
}

/// Applies polarity classes to rendered results pages
pub struct Highlighter {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Highlighter").field("strategies", &names).finish()
    }
}

impl Highlighter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Append a strategy after the default cascade
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl LocateStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Highlight `negative` and `positive` matches in `html`
    pub fn apply(
        &self,
        html: &str,
        negative: &[SearchResult],
        positive: &[SearchResult],
        result_type: ResultType,
        keywords: &KeywordHighlight,
    ) -> (String, HighlightReport) {
        let selectors = selectors_for(result_type);
        let mut out = inject_styles(html);
        let mut report = HighlightReport::default();

        for (polarity, matches) in [(Polarity::Negative, negative), (Polarity::Positive, positive)] {
            for result in matches {
                let outcome = if result_type.is_type_specific() {
                    typed::wrap_typed(&out, result, polarity)
                } else {
                    self.locate_and_tag(&out, result, polarity, selectors)
                };

                match outcome {
                    TagOutcome::Tagged(next) => {
                        out = next;
                        report.tagged += 1;
                    }
                    TagOutcome::Overwrote(next) => {
                        out = next;
                        report.overwritten += 1;
                    }
                    TagOutcome::AlreadyTagged => report.already_tagged += 1,
                    TagOutcome::Conflict => {
                        debug!(position = result.position, link = %result.link, "Positive match on negative container, left negative");
                        report.conflicts += 1;
                    }
                    TagOutcome::Unlocated => {
                        error!(
                            polarity = polarity.as_str(),
                            position = result.position,
                            title = truncate_for_log(&result.title, 80),
                            link = %result.link,
                            redirect_link = result.redirect_link.as_deref().unwrap_or(""),
                            "Could not locate matched result in rendered HTML"
                        );
                        report.unlocated += 1;
                    }
                }
            }

            let words = keywords.for_polarity(polarity);
            if !words.is_empty() {
                let (next, count) = keyword::keyword_pass(&out, words, polarity, selectors);
                out = next;
                report.keyword_tagged += count;
            }
        }

        info!(
            result_type = ?result_type,
            tagged = report.tagged,
            overwritten = report.overwritten,
            already_tagged = report.already_tagged,
            conflicts = report.conflicts,
            unlocated = report.unlocated,
            keyword_tagged = report.keyword_tagged,
            "Applied highlights"
        );

        (out, report)
    }

    /// Try `link` then `redirect_link` through the cascade; first container wins
    fn locate_and_tag(
        &self,
        html: &str,
        result: &SearchResult,
        polarity: Polarity,
        selectors: &HighlightSelectorSet,
    ) -> TagOutcome {
        let tags = scan_tags(html);

        for link in result.candidate_links() {
            let ctx = LocateContext {
                html,
                tags: &tags,
                result,
                link,
                selectors,
            };

            for strategy in &self.strategies {
                for offset in strategy.candidates(&ctx) {
                    let container = match resolve_container(html, &tags, offset, selectors) {
                        Resolution::Found(c) => c,
                        Resolution::Excluded | Resolution::Empty | Resolution::NoContainer => {
                            continue;
                        }
                    };
                    if !strategy.accepts(&ctx, &container.text) {
                        continue;
                    }

                    debug!(
                        strategy = strategy.name(),
                        position = result.position,
                        link,
                        "Located matched result"
                    );
                    return tag_container(html, &tags[container.tag_idx], polarity);
                }
            }
        }

        TagOutcome::Unlocated
    }
}
