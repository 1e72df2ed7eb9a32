//! Result deduplication by identity key
//!
//! Rules append to a channel independently, so the same result can arrive
//! several times. Identity is the link; position only stands in when a
//! result has no link, because positions repeat across pages.

use std::collections::HashSet;

use crate::provider::SearchResult;

/// Identity of a result inside one match list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Link(String),
    Position(u32),
    Text(String),
}

impl DedupKey {
    #[must_use]
    pub fn of(result: &SearchResult) -> Self {
        if !result.link.is_empty() {
            DedupKey::Link(result.link.clone())
        } else if result.position > 0 {
            DedupKey::Position(result.position)
        } else {
            DedupKey::Text(format!("{}{}", result.title, result.snippet))
        }
    }
}

/// Keep the first occurrence of every key, preserving order
pub fn dedup<I>(results: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(DedupKey::of(r)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_primary_key() {
        let a = SearchResult::new(1, "A", "https://a.com/");
        let same_link_other_page = SearchResult::new(7, "A again", "https://a.com/");
        let b = SearchResult::new(1, "B", "https://b.com/");

        let out = dedup(vec![a.clone(), same_link_other_page, b.clone()]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn position_then_text_when_link_missing() {
        let p1 = SearchResult::new(3, "X", "");
        let p1_dup = SearchResult::new(3, "Y", "");
        let t1 = SearchResult::new(0, "T", "").with_snippet("s");
        let t1_dup = SearchResult::new(0, "T", "").with_snippet("s");
        let t2 = SearchResult::new(0, "T", "").with_snippet("other");

        let out = dedup(vec![p1.clone(), p1_dup, t1.clone(), t1_dup, t2.clone()]);
        assert_eq!(out, vec![p1, t1, t2]);
    }
}
