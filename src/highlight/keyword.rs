//! Keyword pass over every result container

use serde::{Deserialize, Serialize};

use super::locate::{TagOutcome, tag_container};
use super::scanner::{Tag, element_end, open_elements_at, scan_tags};
use crate::classifier::{MatchRuleConfig, Polarity};
use crate::selectors::HighlightSelectorSet;
use crate::utils::strip_tags;

/// Keywords highlighted wherever they occur in a container, per polarity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordHighlight {
    pub negative: Vec<String>,
    pub positive: Vec<String>,
}

impl KeywordHighlight {
    /// Enabled keyword rules of both channels
    #[must_use]
    pub fn from_rules(rules: &MatchRuleConfig) -> Self {
        Self {
            negative: rules.negative.active_keywords(),
            positive: rules.positive.active_keywords(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.negative.is_empty() && self.positive.is_empty()
    }

    #[must_use]
    pub fn for_polarity(&self, polarity: Polarity) -> &[String] {
        match polarity {
            Polarity::Negative => &self.negative,
            Polarity::Positive => &self.positive,
        }
    }
}

/// Outermost elements matched by any tier of the selector set, in
/// document order; containers nested in an earlier pick are dropped
fn container_indices(tags: &[Tag], selectors: &HighlightSelectorSet, doc_len: usize) -> Vec<usize> {
    let matches = |t: &Tag| {
        t.has_class(selectors.container_class)
            || selectors.data_attributes.iter().any(|a| t.has_attr(a))
            || selectors.additional_classes.iter().any(|c| t.has_class(c))
    };

    let mut picked: Vec<usize> = Vec::new();
    let mut covered_until = 0;
    for (idx, tag) in tags.iter().enumerate() {
        if !tag.opens_scope() || !matches(tag) || tag.start < covered_until {
            continue;
        }
        covered_until = element_end(tags, idx, doc_len);
        picked.push(idx);
    }
    picked
}

/// Tag every container whose text contains one of `keywords`
///
/// Returns the rewritten document and how many containers changed.
pub(crate) fn keyword_pass(
    html: &str,
    keywords: &[String],
    polarity: Polarity,
    selectors: &HighlightSelectorSet,
) -> (String, usize) {
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if needles.is_empty() {
        return (html.to_string(), 0);
    }

    let tags = scan_tags(html);
    let mut out = html.to_string();
    let mut tagged = 0;

    // Rewrites only touch a container's start tag, so walking backwards
    // keeps every earlier offset valid.
    for idx in container_indices(&tags, selectors, html.len()).into_iter().rev() {
        let tag = &tags[idx];

        let excluded = open_elements_at(&tags, tag.start)
            .iter()
            .any(|&i| tags[i].has_class(selectors.excluded_wrapper_class));
        if excluded {
            continue;
        }

        let end = element_end(&tags, idx, html.len());
        let text = strip_tags(&html[tag.start..end]).to_lowercase();
        if text.is_empty() || !needles.iter().any(|k| text.contains(k.as_str())) {
            continue;
        }

        match tag_container(&out, tag, polarity) {
            TagOutcome::Tagged(next) | TagOutcome::Overwrote(next) => {
                out = next;
                tagged += 1;
            }
            _ => {}
        }
    }

    (out, tagged)
}
