//! Domain normalisation for URL rules
//!
//! Users paste anything into URL rule lists: bare domains, full URLs,
//! `www.` prefixes, trailing paths. Everything is reduced to a lower-case
//! host without `www.` so rule domains and result links compare directly.

use thiserror::Error;
use url::Url;

/// Why a URL-like string could not be reduced to a domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("empty URL")]
    Empty,

    #[error("unparseable URL '{input}': {reason}")]
    Unparseable { input: String, reason: String },

    #[error("URL '{0}' has no host")]
    NoHost(String),

    #[error("'{0}' is not a plausible domain")]
    NotADomain(String),
}

/// Second-level labels under two-letter country TLDs that act as suffixes
const CC_SECOND_LEVEL: &[&str] = &["co", "com", "net", "org", "gov", "ac", "edu", "ne", "or"];

/// Reduce a user-supplied URL or domain to its comparable host
///
/// Prepends `https://` when no scheme is present, strips a leading `www.`,
/// and rejects hosts without a dot. Returns an error instead of panicking;
/// callers log and skip the entry.
///
/// # Example
/// ```
/// use stillbrook::domain::normalize;
///
/// assert_eq!(normalize("  WWW.TechCorp.com/about ").unwrap(), "techcorp.com");
/// assert!(normalize("localhost").is_err());
/// ```
pub fn normalize(url_like: &str) -> Result<String, DomainError> {
    let trimmed = url_like.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Empty);
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| DomainError::Unparseable {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed
        .host_str()
        .ok_or_else(|| DomainError::NoHost(trimmed.to_string()))?
        .trim_end_matches('.')
        .to_ascii_lowercase();

    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);

    if !host.contains('.') {
        return Err(DomainError::NotADomain(trimmed.to_string()));
    }

    Ok(host)
}

/// `host` equals `domain` or is one of its subdomains
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

/// Registrable apex of a host: `blog.techcorp.com` → `techcorp.com`,
/// `news.bbc.co.uk` → `bbc.co.uk`
#[must_use]
pub fn apex_domain(host: &str) -> String {
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if last.len() == 2 && CC_SECOND_LEVEL.contains(&second) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}
