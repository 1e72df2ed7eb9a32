//! Lenient tag scanner for rendered result pages
//!
//! Not a parser: it tokenises start/end tags with attribute byte spans so
//! callers can edit the original string in place. Comments, doctypes and
//! `<script>`/`<style>` bodies are skipped. Void elements and `/>` tags never
//! open a scope, and an unmatched end tag closes back to the nearest open
//! element of the same name, or is ignored.

use std::ops::Range;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lower-cased attribute name
    pub name: String,
    /// Raw value without quotes, entities left encoded
    pub value: Option<String>,
    /// Bytes of the whole `name="value"` text
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Offset of `<`
    pub start: usize,
    /// Offset just past `>`
    pub end: usize,
    /// Offset just past the tag name, where new attributes can be inserted
    pub name_end: usize,
    pub name: String,
    pub kind: TagKind,
    pub attrs: Vec<Attr>,
}

impl Tag {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    #[must_use]
    pub fn attr_entry(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        !class.is_empty() && self.classes().any(|c| c == class)
    }

    /// Opens a scope that a later end tag closes
    #[must_use]
    pub fn opens_scope(&self) -> bool {
        self.kind == TagKind::Open && !is_void(&self.name)
    }
}

#[must_use]
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Tokenise every start and end tag in document order
#[must_use]
pub fn scan_tags(html: &str) -> Vec<Tag> {
    let bytes = html.as_bytes();
    let len = html.len();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(rel) = html[i..].find('<') {
        let start = i + rel;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            i = html[start + 4..]
                .find("-->")
                .map_or(len, |e| start + 4 + e + 3);
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            i = html[start..].find('>').map_or(len, |e| start + e + 1);
            continue;
        }

        let closing = rest.starts_with("</");
        let name_start = start + if closing { 2 } else { 1 };
        if name_start >= len || !bytes[name_start].is_ascii_alphabetic() {
            i = start + 1;
            continue;
        }
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-' || **b == b':')
            .count();
        let name_end = name_start + name_len;
        let name = html[name_start..name_end].to_ascii_lowercase();

        let (attrs, end, self_closing) = parse_attrs(html, name_end);
        let kind = if closing {
            TagKind::Close
        } else if self_closing {
            TagKind::SelfClosing
        } else {
            TagKind::Open
        };

        i = end;
        if kind == TagKind::Open && (name == "script" || name == "style") {
            let close = format!("</{name}");
            i = html[end..]
                .to_ascii_lowercase()
                .find(&close)
                .map_or(len, |p| end + p);
        }

        tags.push(Tag {
            start,
            end,
            name_end,
            name,
            kind,
            attrs: if closing { Vec::new() } else { attrs },
        });
    }

    tags
}

fn parse_attrs(html: &str, from: usize) -> (Vec<Attr>, usize, bool) {
    let b = html.as_bytes();
    let len = html.len();
    let mut attrs = Vec::new();
    let mut i = from;

    loop {
        while i < len && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            return (attrs, len, false);
        }
        match b[i] {
            b'>' => return (attrs, i + 1, false),
            b'/' if i + 1 < len && b[i + 1] == b'>' => return (attrs, i + 2, true),
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < len
            && !b[i].is_ascii_whitespace()
            && b[i] != b'='
            && b[i] != b'>'
            && !(b[i] == b'/' && i + 1 < len && b[i + 1] == b'>')
        {
            i += 1;
        }
        if i == name_start {
            i += 1;
            continue;
        }
        let name = html[name_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < len && b[j].is_ascii_whitespace() {
            j += 1;
        }
        if j < len && b[j] == b'=' {
            j += 1;
            while j < len && b[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < len && (b[j] == b'"' || b[j] == b'\'') {
                let quote = b[j] as char;
                let value_start = j + 1;
                let value_end = html[value_start..]
                    .find(quote)
                    .map_or(len, |p| value_start + p);
                i = (value_end + 1).min(len);
                attrs.push(Attr {
                    name,
                    value: Some(html[value_start..value_end].to_string()),
                    span: name_start..i,
                });
            } else {
                let value_start = j;
                while j < len && !b[j].is_ascii_whitespace() && b[j] != b'>' {
                    j += 1;
                }
                i = j;
                attrs.push(Attr {
                    name,
                    value: Some(html[value_start..j].to_string()),
                    span: name_start..i,
                });
            }
        } else {
            attrs.push(Attr {
                name,
                value: None,
                span: name_start..i,
            });
        }
    }
}

/// Indices of elements open at `offset`, outermost first
///
/// A tag starting exactly at `offset` counts as open, so an offset inside
/// an anchor's attributes yields the anchor and all its ancestors.
#[must_use]
pub fn open_elements_at(tags: &[Tag], offset: usize) -> Vec<usize> {
    let mut stack: Vec<usize> = Vec::new();
    for (idx, tag) in tags.iter().enumerate() {
        if tag.start > offset {
            break;
        }
        match tag.kind {
            TagKind::Open if tag.opens_scope() => stack.push(idx),
            TagKind::Close => {
                if let Some(pos) = stack.iter().rposition(|&s| tags[s].name == tag.name) {
                    stack.truncate(pos);
                }
            }
            _ => {}
        }
    }
    stack
}

/// Offset just past the end tag that balances `tags[idx]`
///
/// Unclosed elements run to the end of the document.
#[must_use]
pub fn element_end(tags: &[Tag], idx: usize, doc_len: usize) -> usize {
    let open = &tags[idx];
    if !open.opens_scope() {
        return open.end;
    }

    let mut stack: Vec<&str> = vec![open.name.as_str()];
    for tag in &tags[idx + 1..] {
        match tag.kind {
            TagKind::Open if tag.opens_scope() => stack.push(tag.name.as_str()),
            TagKind::Close => {
                if let Some(pos) = stack.iter().rposition(|n| *n == tag.name) {
                    stack.truncate(pos);
                    if stack.is_empty() {
                        return tag.end;
                    }
                }
            }
            _ => {}
        }
    }
    doc_len
}
