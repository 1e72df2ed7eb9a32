//! Highlight stylesheet injection

use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::Polarity;
use crate::utils::{HIGHLIGHT_STYLE_ID, NEGATIVE_CLASS, POSITIVE_CLASS};

static HEAD_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</head\s*>").expect("HEAD_CLOSE_RE: hardcoded regex is valid")
});

/// Inline style for type-specific wrappers, where a class on a deep
/// container would be overridden by the page's own rules
pub(crate) fn inline_style(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Negative => {
            "display:inline-block;outline:4px solid #d93025;outline-offset:-4px;background-color:rgba(217,48,37,0.12);"
        }
        Polarity::Positive => {
            "display:inline-block;outline:4px solid #188038;outline-offset:-4px;background-color:rgba(24,128,56,0.12);"
        }
    }
}

pub(crate) fn class_for(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Negative => NEGATIVE_CLASS,
        Polarity::Positive => POSITIVE_CLASS,
    }
}

/// Polarity classes plus the layout used by the synthetic preview
#[must_use]
pub fn stylesheet() -> String {
    format!(
        ".{neg} {{ outline: 3px solid #d93025 !important; outline-offset: 2px; \
background-color: rgba(217, 48, 37, 0.08) !important; border-radius: 6px; }}\n\
.{pos} {{ outline: 3px solid #188038 !important; outline-offset: 2px; \
background-color: rgba(24, 128, 56, 0.08) !important; border-radius: 6px; }}\n\
.stillbrook-preview {{ font-family: arial, sans-serif; max-width: 720px; margin: 16px auto; }}\n\
.stillbrook-result {{ padding: 12px; margin-bottom: 16px; }}\n\
.stillbrook-source {{ color: #4d5156; font-size: 14px; }}\n\
.stillbrook-title {{ color: #1a0dab; font-size: 20px; text-decoration: none; }}\n\
.stillbrook-snippet {{ color: #4d5156; font-size: 14px; line-height: 1.58; }}\n\
.stillbrook-image-grid {{ display: flex; flex-wrap: wrap; gap: 12px; max-width: 960px; }}\n\
.stillbrook-image-grid .stillbrook-result {{ width: 200px; margin: 0; }}\n\
.stillbrook-image-grid img {{ max-width: 100%; height: auto; display: block; }}\n\
.stillbrook-empty {{ color: #70757a; }}\n\
mark.stillbrook-keyword {{ background-color: #fde293; padding: 0 1px; }}\n",
        neg = NEGATIVE_CLASS,
        pos = POSITIVE_CLASS,
    )
}

/// Add the highlight `<style>` block once
///
/// Goes before `</head>` when there is one, otherwise at the very start.
#[must_use]
pub fn inject_styles(html: &str) -> String {
    if html.contains(&format!("id=\"{HIGHLIGHT_STYLE_ID}\"")) {
        return html.to_string();
    }

    let block = format!("<style id=\"{HIGHLIGHT_STYLE_ID}\">\n{}</style>", stylesheet());
    match HEAD_CLOSE_RE.find(html) {
        Some(m) => {
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..m.start()]);
            out.push_str(&block);
            out.push_str(&html[m.start()..]);
            out
        }
        None => format!("{block}{html}"),
    }
}
