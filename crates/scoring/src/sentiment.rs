//! Keyword-baseline sentiment analysis.
//!
//! Tokenizes on whitespace and classifies each token by substring match
//! against three fixed keyword lists. Always returns a result for any input
//! string; when no sentiment words are found a punctuation heuristic supplies
//! a mild fallback.

use serde::{Deserialize, Serialize};

use lead_engine_core::SentimentLabel;

const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "great",
    "awesome",
    "fantastic",
    "love",
    "amazing",
    "perfect",
    "wonderful",
    "outstanding",
    "impressed",
    "excited",
    "interested",
    "yes",
    "definitely",
    "absolutely",
    "looking forward",
    "thank you",
    "appreciate",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "terrible",
    "awful",
    "hate",
    "horrible",
    "disappointed",
    "frustrated",
    "angry",
    "upset",
    "no",
    "never",
    "not interested",
    "waste of time",
    "expensive",
    "overpriced",
    "complicated",
    "difficult",
    "problem",
    "issue",
];

const NEUTRAL_KEYWORDS: &[&str] = &[
    "okay",
    "fine",
    "maybe",
    "perhaps",
    "consider",
    "think about",
    "let me check",
    "not sure",
    "unclear",
    "question",
    "information",
];

/// Result of a sentiment analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub sentiment: SentimentLabel,
    /// Valence in [-1, 1].
    pub score: f64,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    /// The tokens that carried sentiment.
    pub keywords: Vec<String>,
}

fn matches_any(token: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| token.contains(k))
}

/// Analyze free text. Never fails; empty or keyword-free input yields a
/// neutral zero-confidence result (modulo the punctuation fallback).
pub fn analyze(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut neutral = 0usize;
    let mut found = Vec::new();

    for word in &words {
        if matches_any(word, POSITIVE_KEYWORDS) {
            positive += 1;
            found.push((*word).to_string());
        } else if matches_any(word, NEGATIVE_KEYWORDS) {
            negative += 1;
            found.push((*word).to_string());
        } else if matches_any(word, NEUTRAL_KEYWORDS) {
            neutral += 1;
            found.push((*word).to_string());
        }
    }

    let total = positive + negative + neutral;
    let mut score = 0.0;
    let mut sentiment = SentimentLabel::Neutral;
    let mut confidence = 0.0;

    if total > 0 {
        score = (positive as f64 - negative as f64) / total as f64;
        confidence = (total as f64 / words.len() as f64 * 4.0).min(1.0);
        sentiment = if score > 0.1 {
            SentimentLabel::Positive
        } else if score < -0.1 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
    } else if text.contains('!') && !text.contains('?') {
        score = 0.3;
        sentiment = SentimentLabel::Positive;
        confidence = 0.3;
    } else if text.contains('?') && text.len() < 50 {
        score = 0.1;
        sentiment = SentimentLabel::Neutral;
        confidence = 0.4;
    }

    SentimentResult {
        sentiment,
        score,
        confidence,
        keywords: found,
    }
}
