//! Lexical sentiment scoring
//!
//! Sums per-word valences over a snippet. The classifier only acts on
//! totals past [`SentimentThresholds`].

mod lexicon;

use std::collections::{HashMap, HashSet};

use crate::utils::{NEGATIVE_SENTIMENT_THRESHOLD, POSITIVE_SENTIMENT_THRESHOLD};

/// Scores free text; negative totals mean negative tone
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> i32;
}

/// Score bounds for the sentiment rule of each channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentThresholds {
    /// Negative channel fires at or below this score
    pub negative: i32,
    /// Positive channel fires at or above this score
    pub positive: i32,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            negative: NEGATIVE_SENTIMENT_THRESHOLD,
            positive: POSITIVE_SENTIMENT_THRESHOLD,
        }
    }
}

impl SentimentThresholds {
    #[must_use]
    pub fn is_negative(&self, score: i32) -> bool {
        score <= self.negative
    }

    #[must_use]
    pub fn is_positive(&self, score: i32) -> bool {
        score >= self.positive
    }
}

/// Word-list scorer with single-token negation
///
/// Build once at startup and share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, i32>,
    negators: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            valences: lexicon::WORD_VALENCES
                .iter()
                .map(|(w, v)| ((*w).to_string(), *v))
                .collect(),
            negators: lexicon::NEGATORS.iter().copied().collect(),
        }
    }

    /// Add or override word ratings (e.g. industry vocabulary)
    #[must_use]
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        for (word, valence) in words {
            self.valences.insert(word.into().to_lowercase(), valence);
        }
        self
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2019}' => '\'',
            c if c.is_alphanumeric() || c == '\'' || c == '-' => c,
            _ => ' ',
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> i32 {
        let tokens = tokenize(text);
        let mut total = 0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.valences.get(token.as_str()) else {
                continue;
            };
            let negated = i > 0 && self.negators.contains(tokens[i - 1].as_str());
            total += if negated { -valence } else { valence };
        }
        total
    }
}
