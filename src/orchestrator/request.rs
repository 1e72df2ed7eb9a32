//! Inbound search request and caller identity

use serde::{Deserialize, Serialize};

use crate::classifier::MatchRuleConfig;
use crate::provider::SearchQuery;
use crate::selectors::ResultType;

fn default_true() -> bool {
    true
}

/// Parameters of one search run, as sent by the request handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub keyword: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Provider search domain, e.g. `google.co.uk`
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Provider code or name; unknown values mean web
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default, alias = "searchPage2")]
    pub include_page_two: bool,
    #[serde(default)]
    pub rules: MatchRuleConfig,
    /// Run the keyword pass over all containers after match highlighting
    #[serde(default = "default_true")]
    pub highlight_keywords: bool,
}

impl SearchRequest {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: None,
            domain: None,
            language: None,
            result_type: None,
            country_code: None,
            include_page_two: false,
            rules: MatchRuleConfig::default(),
            highlight_keywords: true,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: MatchRuleConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_page_two(mut self) -> Self {
        self.include_page_two = true;
        self
    }

    #[must_use]
    pub fn with_result_type(mut self, code: impl Into<String>) -> Self {
        self.result_type = Some(code.into());
        self
    }

    #[must_use]
    pub fn result_type(&self) -> ResultType {
        ResultType::from_code(self.result_type.as_deref())
    }

    /// Provider query for page 1
    #[must_use]
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            keyword: self.keyword.trim().to_string(),
            location: self.location.clone(),
            domain: self.domain.clone(),
            language: self.language.clone(),
            result_type: self.result_type(),
            country_code: self.country_code.clone(),
            page: 0,
        }
    }
}

/// Who asked for the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_page_two_flag_and_defaults() {
        let request: SearchRequest = serde_json::from_str(
            r#"{ "keyword": " techcorp ", "resultType": "nws", "searchPage2": true }"#,
        )
        .unwrap();
        assert!(request.include_page_two);
        assert!(request.highlight_keywords);
        assert_eq!(request.result_type(), ResultType::News);
        let query = request.to_query();
        assert_eq!(query.keyword, "techcorp");
        assert_eq!(query.page, 0);
    }
}
