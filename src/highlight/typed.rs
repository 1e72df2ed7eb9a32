//! Direct wrapping for image and shopping results
//!
//! Image grids and product cards nest the result several levels below any
//! stable class, so instead of resolving a container the result title is
//! matched against an `<img alt>` (wrapped in a styled span) or against a
//! short text element (styled in place). Both carry a `data-stillbrook`
//! marker so a second pass can see what is already tagged.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::locate::TagOutcome;
use super::styles::{class_for, inline_style};
use crate::classifier::Polarity;
use crate::provider::SearchResult;
use crate::utils::{escape_attr, escape_text};

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#" data-stillbrook="(negative|positive)" style="[^"]*""#)
        .expect("MARKER_RE: hardcoded regex is valid")
});

static WRAP_OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<span class="stillbrook-(?:negative|positive)" data-stillbrook="(negative|positive)" style="[^"]*">$"#,
    )
    .expect("WRAP_OPENER_RE: hardcoded regex is valid")
});

const WRAP_OPENER_PREFIX: &str = "<span class=\"stillbrook-";

fn polarity_of(marker: &str) -> Polarity {
    if marker == "negative" {
        Polarity::Negative
    } else {
        Polarity::Positive
    }
}

fn marker(polarity: Polarity) -> String {
    format!(
        " data-stillbrook=\"{}\" style=\"{}\"",
        polarity.as_str(),
        inline_style(polarity)
    )
}

fn wrap_opener(polarity: Polarity) -> String {
    format!("<span class=\"{}\"{}>", class_for(polarity), marker(polarity))
}

/// Literal title forms that can appear in markup
fn title_pattern(title: &str, encode: fn(&str) -> std::borrow::Cow<'_, str>) -> String {
    let raw = regex::escape(title);
    let encoded = regex::escape(&encode(title));
    if raw == encoded {
        raw
    } else {
        format!("(?:{raw}|{encoded})")
    }
}

/// Tag the first image or short text element carrying `result`'s title
pub(crate) fn wrap_typed(html: &str, result: &SearchResult, polarity: Polarity) -> TagOutcome {
    let title = result.title.trim();
    if title.is_empty() {
        return TagOutcome::Unlocated;
    }

    if let Some(outcome) = wrap_image(html, title, polarity) {
        return outcome;
    }
    if let Some(outcome) = style_text_element(html, title, polarity) {
        return outcome;
    }

    debug!(position = result.position, title, "No image or text pattern for typed result");
    TagOutcome::Unlocated
}

fn wrap_image(html: &str, title: &str, polarity: Polarity) -> Option<TagOutcome> {
    let pattern = format!(
        r#"(?i)<img\b[^>]*?\balt\s*=\s*"{}"[^>]*>"#,
        title_pattern(title, escape_attr)
    );
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(html)?;

    let before = &html[..m.start()];
    if let Some(opener_start) = before.rfind(WRAP_OPENER_PREFIX)
        && let Some(caps) = WRAP_OPENER_RE.captures(&before[opener_start..])
    {
        let existing = polarity_of(&caps[1]);
        return Some(match (existing, polarity) {
            (a, b) if a == b => TagOutcome::AlreadyTagged,
            (Polarity::Negative, Polarity::Positive) => TagOutcome::Conflict,
            _ => TagOutcome::Overwrote(format!(
                "{}{}{}",
                &html[..opener_start],
                wrap_opener(polarity),
                &html[m.start()..]
            )),
        });
    }

    Some(TagOutcome::Tagged(format!(
        "{}{}{}</span>{}",
        &html[..m.start()],
        wrap_opener(polarity),
        m.as_str(),
        &html[m.end()..]
    )))
}

fn style_text_element(html: &str, title: &str, polarity: Polarity) -> Option<TagOutcome> {
    let pattern = format!(
        r"(?i)<(div|span|h3|h4|a)\b[^>]*>\s*{}\s*</(?:div|span|h3|h4|a)>",
        title_pattern(title, escape_text)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(html)?;
    let whole = caps.get(0)?;
    let name = caps.get(1)?;

    let open_end = whole.start() + whole.as_str().find('>')? + 1;
    let opening = &html[whole.start()..open_end];

    if let Some(existing) = MARKER_RE.captures(opening) {
        let existing_polarity = polarity_of(&existing[1]);
        let span = existing.get(0)?;
        return Some(match (existing_polarity, polarity) {
            (a, b) if a == b => TagOutcome::AlreadyTagged,
            (Polarity::Negative, Polarity::Positive) => TagOutcome::Conflict,
            _ => {
                let at = whole.start() + span.start();
                TagOutcome::Overwrote(format!(
                    "{}{}{}",
                    &html[..at],
                    marker(polarity),
                    &html[whole.start() + span.end()..]
                ))
            }
        });
    }

    Some(TagOutcome::Tagged(format!(
        "{}{}{}",
        &html[..name.end()],
        marker(polarity),
        &html[name.end()..]
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> SearchResult {
        SearchResult::new(1, title, "https://shop.example.com/p/1")
    }

    #[test]
    fn wraps_image_by_alt_and_is_idempotent() {
        let html = r#"<div><img class="YQ4gaf" src="a.jpg" alt="Red &amp; Blue Mug"></div>"#;
        let TagOutcome::Tagged(once) = wrap_typed(html, &result("Red & Blue Mug"), Polarity::Negative)
        else {
            panic!("expected image wrap");
        };
        assert!(once.contains(r#"<span class="stillbrook-negative" data-stillbrook="negative""#));
        assert!(once.contains(r#"alt="Red &amp; Blue Mug"></span></div>"#));
        assert_eq!(
            wrap_typed(&once, &result("Red & Blue Mug"), Polarity::Negative),
            TagOutcome::AlreadyTagged
        );
        assert_eq!(
            wrap_typed(&once, &result("Red & Blue Mug"), Polarity::Positive),
            TagOutcome::Conflict
        );
    }

    #[test]
    fn styles_short_text_element() {
        let html = r#"<div class="card"><h3 class="tAxDx"> Acme Kettle </h3></div>"#;
        let TagOutcome::Tagged(out) = wrap_typed(html, &result("Acme Kettle"), Polarity::Positive)
        else {
            panic!("expected text styling");
        };
        assert!(out.starts_with(r#"<div class="card"><h3 data-stillbrook="positive" style=""#));

        match wrap_typed(&out, &result("Acme Kettle"), Polarity::Negative) {
            TagOutcome::Overwrote(neg) => {
                assert!(neg.contains(r#"<h3 data-stillbrook="negative""#));
                assert!(!neg.contains("data-stillbrook=\"positive\""));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_title_is_unlocated() {
        let html = "<div><img alt=\"Something else\"></div>";
        assert_eq!(wrap_typed(html, &result("Acme Kettle"), Polarity::Negative), TagOutcome::Unlocated);
    }
}
