//! Aspect-based sentiment via the chat backend.
//!
//! Asks for a strict JSON object covering overall sentiment plus the four
//! fixed aspects (product, price, urgency, general) and validates every
//! field, clamping scores into range and defaulting anything malformed.
//! Callers must fall back to the keyword analyzer on any error here.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lead_engine_core::SentimentLabel;

use crate::chat::{ChatBackend, ChatMessage, ChatOptions};
use crate::LlmError;

const ASPECTS: [&str; 4] = ["product", "price", "urgency", "general"];
const MAX_INPUT_CHARS: usize = 2000;
const DEFAULT_CONFIDENCE: f64 = 0.8;

const SYSTEM_PROMPT: &str = r#"You analyze B2B sales/customer interaction text for sentiment. Return a JSON object with:
- sentiment: "positive" | "neutral" | "negative" (overall)
- score: number from -1 to 1 (negative to positive)
- confidence: number from 0 to 1
- aspects: object with keys "product", "price", "urgency", "general" - each has { sentiment, score } where score is -1 to 1

Be concise. Focus on buyer intent and engagement signals."#;

/// Per-aspect sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub sentiment: SentimentLabel,
    pub score: f64,
}

/// Full LLM sentiment result. `keywords` stays empty for API compatibility
/// with the keyword analyzer's response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmSentimentResult {
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub aspects: BTreeMap<String, AspectSentiment>,
}

pub struct LlmSentimentProvider {
    backend: Arc<dyn ChatBackend>,
}

fn parse_label(value: Option<&Value>) -> Option<SentimentLabel> {
    match value.and_then(Value::as_str) {
        Some("positive") => Some(SentimentLabel::Positive),
        Some("neutral") => Some(SentimentLabel::Neutral),
        Some("negative") => Some(SentimentLabel::Negative),
        _ => None,
    }
}

impl LlmSentimentProvider {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub async fn analyze(&self, text: &str) -> Result<LlmSentimentResult, LlmError> {
        let truncated: String = text.chars().take(MAX_INPUT_CHARS).collect();
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Analyze sentiment for this B2B interaction:\n\n\"{truncated}\""
            )),
        ];
        let options = ChatOptions {
            temperature: Some(0.2),
            json_response: true,
            tools: None,
        };

        let reply = self.backend.chat(&messages, &options).await?;
        let content = reply
            .content
            .ok_or_else(|| LlmError::InvalidResponse("empty completion".to_string()))?;
        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| LlmError::InvalidResponse(format!("bad sentiment JSON: {e}")))?;

        Ok(Self::validate(&parsed))
    }

    /// Coerce the model's JSON into a well-formed result: labels default to
    /// neutral, scores clamp to [-1, 1], confidence clamps to [0, 1] with a
    /// 0.8 default, and all four aspects are always present.
    fn validate(parsed: &Value) -> LlmSentimentResult {
        let sentiment = parse_label(parsed.get("sentiment")).unwrap_or(SentimentLabel::Neutral);
        let score = parsed
            .get("score")
            .and_then(Value::as_f64)
            .map(|s| s.clamp(-1.0, 1.0))
            .unwrap_or(0.0);
        let confidence = parsed
            .get("confidence")
            .and_then(Value::as_f64)
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_CONFIDENCE);

        let mut aspects = BTreeMap::new();
        for key in ASPECTS {
            let aspect = parsed.get("aspects").and_then(|a| a.get(key));
            aspects.insert(
                key.to_string(),
                AspectSentiment {
                    sentiment: parse_label(aspect.and_then(|a| a.get("sentiment")))
                        .unwrap_or(SentimentLabel::Neutral),
                    score: aspect
                        .and_then(|a| a.get("score"))
                        .and_then(Value::as_f64)
                        .map(|s| s.clamp(-1.0, 1.0))
                        .unwrap_or(0.0),
                },
            );
        }

        LlmSentimentResult {
            sentiment,
            score,
            confidence,
            keywords: Vec::new(),
            aspects,
        }
    }
}
