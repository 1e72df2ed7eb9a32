//! Locating cascade for matched results
//!
//! Each strategy proposes byte offsets for a candidate link. An offset is
//! resolved to the enclosing result container by walking the open-element
//! stack, then the container's start tag is rewritten with the polarity
//! class.

use html_escape::decode_html_entities;

use super::scanner::{Tag, element_end, open_elements_at};
use super::styles::class_for;
use crate::classifier::Polarity;
use crate::domain;
use crate::provider::SearchResult;
use crate::selectors::HighlightSelectorSet;
use crate::utils::{NEGATIVE_CLASS, POSITIVE_CLASS, escape_attr, strip_tags};

/// Everything a strategy may look at for one candidate link
pub struct LocateContext<'a> {
    pub html: &'a str,
    pub tags: &'a [Tag],
    pub result: &'a SearchResult,
    /// `link` or `redirect_link`, whichever is being tried
    pub link: &'a str,
    pub selectors: &'a HighlightSelectorSet,
}

/// One way of finding a result in rendered markup
pub trait LocateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Offsets inside (or at the start of) candidate elements, best first
    fn candidates(&self, ctx: &LocateContext<'_>) -> Vec<usize>;

    /// Final say on a resolved container, given its plain text
    fn accepts(&self, _ctx: &LocateContext<'_>, _container_text: &str) -> bool {
        true
    }
}

/// Whether a raw `href` value points at `link`
pub(crate) fn href_matches(raw_href: &str, link: &str) -> bool {
    let href = decode_html_entities(raw_href);
    let href = href.trim();
    href == link || (!link.is_empty() && href.trim_end_matches('/') == link.trim_end_matches('/'))
}

fn anchor_offsets<'t>(
    tags: &'t [Tag],
    link: &'t str,
    extra: impl Fn(&Tag) -> bool + 't,
) -> impl Iterator<Item = usize> + 't {
    tags.iter()
        .filter(move |t| t.name == "a" && t.attr("href").is_some_and(|h| href_matches(h, link)))
        .filter(move |t| extra(*t))
        .map(|t| t.start)
}

/// Anchor with the exact href and the title-link class
pub struct HrefWithLinkClass;

impl LocateStrategy for HrefWithLinkClass {
    fn name(&self) -> &'static str {
        "href+link-class"
    }

    fn candidates(&self, ctx: &LocateContext<'_>) -> Vec<usize> {
        let class = ctx.selectors.link_class;
        if class.is_empty() {
            return Vec::new();
        }
        anchor_offsets(ctx.tags, ctx.link, move |t| t.has_class(class)).collect()
    }
}

/// Any anchor with the exact href
pub struct AnchorHref;

impl LocateStrategy for AnchorHref {
    fn name(&self) -> &'static str {
        "href"
    }

    fn candidates(&self, ctx: &LocateContext<'_>) -> Vec<usize> {
        anchor_offsets(ctx.tags, ctx.link, |_| true).collect()
    }
}

/// Node whose `data-result-index` is the zero-based position
pub struct DataResultIndex;

impl LocateStrategy for DataResultIndex {
    fn name(&self) -> &'static str {
        "data-result-index"
    }

    fn candidates(&self, ctx: &LocateContext<'_>) -> Vec<usize> {
        let Some(index) = ctx.result.position.checked_sub(1) else {
            return Vec::new();
        };
        let index = index.to_string();
        ctx.tags
            .iter()
            .filter(|t| t.attr("data-result-index").is_some_and(|v| v.trim() == index))
            .map(|t| t.start)
            .collect()
    }
}

/// Literal href anywhere in the markup, inside a container whose text
/// names the link's apex domain
pub struct DomainAndHref;

impl LocateStrategy for DomainAndHref {
    fn name(&self) -> &'static str {
        "domain+href"
    }

    fn candidates(&self, ctx: &LocateContext<'_>) -> Vec<usize> {
        if ctx.link.is_empty() {
            return Vec::new();
        }
        let encoded = ctx.link.replace('&', "&amp;");
        let mut offsets: Vec<usize> = ctx.html.match_indices(ctx.link).map(|(i, _)| i).collect();
        if encoded != ctx.link {
            offsets.extend(ctx.html.match_indices(encoded.as_str()).map(|(i, _)| i));
            offsets.sort_unstable();
        }
        offsets
    }

    fn accepts(&self, ctx: &LocateContext<'_>, container_text: &str) -> bool {
        match domain::normalize(ctx.link) {
            Ok(host) => container_text
                .to_lowercase()
                .contains(&domain::apex_domain(&host)),
            Err(_) => false,
        }
    }
}

/// Default cascade, in order
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn LocateStrategy>> {
    vec![
        Box::new(HrefWithLinkClass),
        Box::new(AnchorHref),
        Box::new(DataResultIndex),
        Box::new(DomainAndHref),
    ]
}

/// A result container resolved from an offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Container {
    pub tag_idx: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Found(Container),
    /// Inside the excluded wrapper (ads and similar chrome)
    Excluded,
    /// Container has no visible text
    Empty,
    NoContainer,
}

/// Innermost open element at `offset` identified by the selector set:
/// container class first, then data attributes, then additional classes
pub(crate) fn resolve_container(
    html: &str,
    tags: &[Tag],
    offset: usize,
    selectors: &HighlightSelectorSet,
) -> Resolution {
    let open = open_elements_at(tags, offset);

    if open
        .iter()
        .any(|&i| tags[i].has_class(selectors.excluded_wrapper_class))
    {
        return Resolution::Excluded;
    }

    let by_class = |i: &&usize| tags[**i].has_class(selectors.container_class);
    let by_data = |i: &&usize| {
        selectors
            .data_attributes
            .iter()
            .any(|a| tags[**i].has_attr(a))
    };
    let by_additional = |i: &&usize| {
        selectors
            .additional_classes
            .iter()
            .any(|c| tags[**i].has_class(c))
    };

    let found = open
        .iter()
        .rev()
        .find(by_class)
        .or_else(|| open.iter().rev().find(by_data))
        .or_else(|| open.iter().rev().find(by_additional));

    let Some(&tag_idx) = found else {
        return Resolution::NoContainer;
    };

    let end = element_end(tags, tag_idx, html.len());
    let text = strip_tags(&html[tags[tag_idx].start..end]);
    if text.is_empty() {
        return Resolution::Empty;
    }

    Resolution::Found(Container { tag_idx, end, text })
}

/// What happened to one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Class added; carries the rewritten document
    Tagged(String),
    /// Negative class replaced a positive one
    Overwrote(String),
    AlreadyTagged,
    /// Positive match on a container that is already negative
    Conflict,
    Unlocated,
}

/// Rewrite `tag`'s class attribute in `html` for `polarity`
///
/// Negative removes a positive class. Positive never touches a negative
/// container.
pub(crate) fn tag_container(html: &str, tag: &Tag, polarity: Polarity) -> TagOutcome {
    let target = class_for(polarity);
    let has_negative = tag.has_class(NEGATIVE_CLASS);
    let has_positive = tag.has_class(POSITIVE_CLASS);

    match polarity {
        Polarity::Negative if has_negative => return TagOutcome::AlreadyTagged,
        Polarity::Positive if has_negative => return TagOutcome::Conflict,
        Polarity::Positive if has_positive => return TagOutcome::AlreadyTagged,
        _ => {}
    }

    let mut classes: Vec<&str> = tag
        .classes()
        .filter(|c| *c != POSITIVE_CLASS && *c != NEGATIVE_CLASS)
        .collect();
    classes.push(target);
    let class_attr = format!("class=\"{}\"", escape_attr(&classes.join(" ")));

    let rewritten = match tag.attr_entry("class") {
        Some(attr) => format!(
            "{}{}{}",
            &html[..attr.span.start],
            class_attr,
            &html[attr.span.end..]
        ),
        None => format!(
            "{} {}{}",
            &html[..tag.name_end],
            class_attr,
            &html[tag.name_end..]
        ),
    };

    if has_positive {
        TagOutcome::Overwrote(rewritten)
    } else {
        TagOutcome::Tagged(rewritten)
    }
}
