//! Per-result-type markup contracts
//!
//! The provider's results page is generated client-side with versioned
//! class names, so every result type carries its own set of identifiers
//! for "one full result entry". The table is static: adding a type or
//! chasing a markup change means editing a constant here, nothing else.

use serde::{Deserialize, Serialize};

/// Search vertical requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Web,
    News,
    Images,
    Videos,
    Shopping,
}

impl ResultType {
    /// Parse a provider code (`nws`, `isch`, `vid`, `shop`) or a plain name
    ///
    /// Unknown or empty codes resolve to [`ResultType::Web`].
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code else {
            return ResultType::Web;
        };
        match code.trim().to_ascii_lowercase().as_str() {
            "nws" | "news" => ResultType::News,
            "isch" | "image" | "images" => ResultType::Images,
            "vid" | "video" | "videos" => ResultType::Videos,
            "shop" | "shopping" => ResultType::Shopping,
            _ => ResultType::Web,
        }
    }

    /// Provider `tbm` parameter, `None` for standard web results
    #[must_use]
    pub fn tbm(self) -> Option<&'static str> {
        match self {
            ResultType::Web => None,
            ResultType::News => Some("nws"),
            ResultType::Images => Some("isch"),
            ResultType::Videos => Some("vid"),
            ResultType::Shopping => Some("shop"),
        }
    }

    /// Types whose markup is matched by title next to an image or short label
    /// instead of through the link-locating cascade
    #[must_use]
    pub fn is_type_specific(self) -> bool {
        matches!(self, ResultType::Images | ResultType::Shopping)
    }
}

/// Identifiers for a single result container in one type's markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSelectorSet {
    /// Class carried by the result container
    pub container_class: &'static str,
    /// Class carried by the result's title anchor, empty when unknown
    pub link_class: &'static str,
    /// Attributes that also identify a container
    pub data_attributes: &'static [&'static str],
    /// Alternate container classes (people-also-ask boxes, clusters)
    pub additional_classes: &'static [&'static str],
    /// Containers nested under this class are never highlighted
    pub excluded_wrapper_class: &'static str,
}

const WEB: HighlightSelectorSet = HighlightSelectorSet {
    container_class: "MjjYud",
    link_class: "zReHs",
    data_attributes: &["data-sokoban-container", "data-rpos"],
    additional_classes: &["g", "related-question-pair", "wHYlTd"],
    excluded_wrapper_class: "uEierd",
};

const NEWS: HighlightSelectorSet = HighlightSelectorSet {
    container_class: "SoaBEf",
    link_class: "WlydOe",
    data_attributes: &["data-news-doc-id", "data-news-cluster-id"],
    additional_classes: &["JJZKK", "MjjYud"],
    excluded_wrapper_class: "uEierd",
};

const IMAGES: HighlightSelectorSet = HighlightSelectorSet {
    container_class: "ivg-i",
    link_class: "EZAeBe",
    data_attributes: &["data-lpage", "data-docid"],
    additional_classes: &["isv-r", "eA0Zlc"],
    excluded_wrapper_class: "uEierd",
};

const VIDEOS: HighlightSelectorSet = HighlightSelectorSet {
    container_class: "RzdJxc",
    link_class: "xMqpbd",
    data_attributes: &["data-vid", "data-surl"],
    additional_classes: &["MjjYud", "g"],
    excluded_wrapper_class: "uEierd",
};

const SHOPPING: HighlightSelectorSet = HighlightSelectorSet {
    container_class: "sh-dgr__content",
    link_class: "shntl",
    data_attributes: &["data-docid", "data-cid"],
    additional_classes: &["i0X6df", "sh-dlr__list-result"],
    excluded_wrapper_class: "uEierd",
};

/// Look up the selector set for a result type
#[must_use]
pub fn selectors_for(result_type: ResultType) -> &'static HighlightSelectorSet {
    match result_type {
        ResultType::Web => &WEB,
        ResultType::News => &NEWS,
        ResultType::Images => &IMAGES,
        ResultType::Videos => &VIDEOS,
        ResultType::Shopping => &SHOPPING,
    }
}
