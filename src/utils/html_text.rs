//! Plain-text helpers for markup fragments
//!
//! The highlighter works on raw provider markup, so "does this container
//! have text" and "does this container mention a keyword" are answered by
//! stripping tags and entities from a byte slice rather than walking a DOM.

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("SCRIPT_RE: hardcoded regex is valid")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("STYLE_RE: hardcoded regex is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT_RE: hardcoded regex is valid"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("TAG_RE: hardcoded regex is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RE: hardcoded regex is valid"));

/// Reduce a markup fragment to its visible text
///
/// Drops script/style bodies and comments, replaces every tag with a space,
/// decodes entities and collapses runs of whitespace.
#[must_use]
pub fn strip_tags(fragment: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(fragment, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let without_comments = COMMENT_RE.replace_all(&without_styles, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");
    let decoded = decode_html_entities(&without_tags);
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Escape text for insertion between tags
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    encode_text(text)
}

/// Escape text for a double-quoted attribute value
#[must_use]
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    encode_double_quoted_attribute(text)
}

/// Truncate at a character boundary for log fields
#[inline]
#[must_use]
pub fn truncate_for_log(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}
