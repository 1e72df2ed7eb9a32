//! Synthetic results page for when no rendered HTML is available

use std::collections::HashSet;
use std::fmt::Write as _;

use regex::RegexBuilder;

use super::styles::{class_for, inject_styles};
use crate::classifier::Polarity;
use crate::provider::SearchResult;
use crate::utils::{escape_attr, escape_text};

/// Escape `text` and wrap case-insensitive occurrences of `keyword` in `<mark>`
#[must_use]
pub fn mark_keyword(text: &str, keyword: Option<&str>) -> String {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return escape_text(text).into_owned();
    };
    let Ok(re) = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    else {
        return escape_text(text).into_owned();
    };

    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_text(&text[last..m.start()]));
        out.push_str("<mark class=\"stillbrook-keyword\">");
        out.push_str(&escape_text(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&escape_text(&text[last..]));
    out
}

/// Build a standalone results page from `results`
///
/// Positions in `negative_positions` get the negative class, then
/// `positive_positions` the positive class; a position in both stays
/// negative.
#[must_use]
pub fn build_preview(
    results: &[SearchResult],
    negative_positions: &[u32],
    positive_positions: &[u32],
    keyword: Option<&str>,
    is_image_search: bool,
) -> String {
    let negative: HashSet<u32> = negative_positions.iter().copied().collect();
    let positive: HashSet<u32> = positive_positions.iter().copied().collect();

    let grid_class = if is_image_search {
        "stillbrook-preview stillbrook-image-grid"
    } else {
        "stillbrook-preview"
    };

    let mut body = String::new();
    let _ = write!(body, "<div class=\"{grid_class}\">");

    if results.is_empty() {
        body.push_str("<p class=\"stillbrook-empty\">No results</p>");
    }

    for result in results {
        let polarity = if negative.contains(&result.position) {
            Some(Polarity::Negative)
        } else if positive.contains(&result.position) {
            Some(Polarity::Positive)
        } else {
            None
        };
        let classes = match polarity {
            Some(p) => format!("stillbrook-result {}", class_for(p)),
            None => "stillbrook-result".to_string(),
        };

        let _ = write!(
            body,
            "<div class=\"{classes}\" data-position=\"{}\">",
            result.position
        );

        if is_image_search {
            if let Some(thumbnail) = result.thumbnail.as_deref().filter(|t| !t.is_empty()) {
                let _ = write!(
                    body,
                    "<a href=\"{}\"><img src=\"{}\" alt=\"{}\"></a>",
                    escape_attr(&result.link),
                    escape_attr(thumbnail),
                    escape_attr(&result.title)
                );
            }
            let _ = write!(
                body,
                "<div class=\"stillbrook-title\">{}</div>",
                mark_keyword(&result.title, keyword)
            );
        } else {
            let source = if result.displayed_source.is_empty() {
                result.link.as_str()
            } else {
                result.displayed_source.as_str()
            };
            let _ = write!(
                body,
                "<div class=\"stillbrook-source\">{}</div>\
                 <a class=\"stillbrook-title\" href=\"{}\">{}</a>",
                escape_text(source),
                escape_attr(&result.link),
                mark_keyword(&result.title, keyword)
            );
            if !result.snippet.is_empty() {
                let _ = write!(
                    body,
                    "<div class=\"stillbrook-snippet\">{}</div>",
                    mark_keyword(&result.snippet, keyword)
                );
            }
        }

        body.push_str("</div>");
    }
    body.push_str("</div>");

    inject_styles(&format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Search preview</title></head><body>{body}</body></html>"
    ))
}
