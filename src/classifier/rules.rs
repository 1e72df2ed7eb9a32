//! Rule configuration for one classification run

use serde::{Deserialize, Serialize};

/// Rules for one polarity channel
///
/// Each rule has its own toggle; a rule with an empty list never fires even
/// when enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelRules {
    pub urls: Vec<String>,
    pub keywords: Vec<String>,
    pub enable_urls: bool,
    pub enable_keywords: bool,
    pub enable_sentiment: bool,
}

impl ChannelRules {
    #[must_use]
    pub fn urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            enable_urls: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            enable_keywords: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sentiment() -> Self {
        Self {
            enable_sentiment: true,
            ..Self::default()
        }
    }

    /// Merge another channel's rules into this one (lists appended, toggles or-ed)
    #[must_use]
    pub fn and(mut self, other: ChannelRules) -> Self {
        self.urls.extend(other.urls);
        self.keywords.extend(other.keywords);
        self.enable_urls |= other.enable_urls;
        self.enable_keywords |= other.enable_keywords;
        self.enable_sentiment |= other.enable_sentiment;
        self
    }

    /// Trimmed, non-empty keywords when the keyword rule can fire
    #[must_use]
    pub fn active_keywords(&self) -> Vec<String> {
        if !self.enable_keywords {
            return Vec::new();
        }
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        !(self.enable_urls && !self.urls.is_empty())
            && !(self.enable_keywords && !self.keywords.is_empty())
            && !self.enable_sentiment
    }
}

/// Negative and positive channel rules for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchRuleConfig {
    pub negative: ChannelRules,
    pub positive: ChannelRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let config: MatchRuleConfig = serde_json::from_str(
            r#"{ "negative": { "urls": ["techcorp.com"], "enableUrls": true } }"#,
        )
        .expect("valid rule config");
        assert!(config.negative.enable_urls);
        assert!(!config.negative.enable_sentiment);
        assert!(config.positive.is_inert());
    }

    #[test]
    fn disabled_keywords_are_inactive() {
        let mut rules = ChannelRules::keywords(["react", "  "]);
        assert_eq!(rules.active_keywords(), vec!["react".to_string()]);
        rules.enable_keywords = false;
        assert!(rules.active_keywords().is_empty());
        assert!(rules.is_inert());
    }
}
