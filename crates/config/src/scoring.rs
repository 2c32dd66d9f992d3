//! The runtime-mutable scoring config document.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lead_engine_core::{AttributionMode, ScoringWeights};

const MAX_SYSTEM_PROMPT_LEN: usize = 2000;
const WEIGHT_MIN: f64 = 0.5;
const WEIGHT_MAX: f64 = 1.5;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a lead prioritization assistant. Given a list of leads with scores and context, suggest the top leads to contact and a brief recommended action for each.";

/// One immutable version of the scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub version: u64,
    pub scoring_weights: ScoringWeights,
    #[serde(default)]
    pub stage_weights: HashMap<String, f64>,
    #[serde(default)]
    pub source_weights: HashMap<String, f64>,
    pub attribution_mode: AttributionMode,
    pub time_decay_lambda: f64,
    pub system_prompt: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            version: 1,
            scoring_weights: ScoringWeights::default(),
            stage_weights: HashMap::new(),
            source_weights: HashMap::new(),
            attribution_mode: AttributionMode::TimeDecay,
            time_decay_lambda: 0.1,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            updated_at: Utc::now(),
        }
    }
}

fn patch_weight_map(target: &mut HashMap<String, f64>, patch: &Value, field: &str) {
    let Some(entries) = patch.as_object() else {
        return;
    };
    for (key, value) in entries {
        match value.as_f64() {
            Some(v) => {
                target.insert(key.clone(), v.clamp(WEIGHT_MIN, WEIGHT_MAX));
            }
            None => {
                tracing::debug!(field, key = %key, "dropping non-numeric weight from patch");
            }
        }
    }
}

impl ScoringConfig {
    /// Build the successor version from a partial patch.
    ///
    /// Each field is validated independently; unknown or invalid fields are
    /// dropped rather than failing the whole patch. The version always
    /// advances, even when nothing survived validation.
    pub fn apply_patch(&self, patch: &Value) -> ScoringConfig {
        let mut next = self.clone();
        next.version = self.version + 1;
        next.updated_at = Utc::now();
        let mut applied = 0usize;

        if let Some(weights) = patch.get("scoringWeights").and_then(Value::as_object) {
            let mut w = self.scoring_weights;
            let fields: [(&str, &mut f64); 5] = [
                ("recencyDecay", &mut w.recency_decay),
                ("emailWeight", &mut w.email_weight),
                ("chatWeight", &mut w.chat_weight),
                ("supportWeight", &mut w.support_weight),
                ("engagementBonusCap", &mut w.engagement_bonus_cap),
            ];
            for (key, slot) in fields {
                if let Some(value) = weights.get(key).and_then(Value::as_f64) {
                    *slot = value;
                    applied += 1;
                }
            }
            next.scoring_weights = w;
        }

        if let Some(prompt) = patch.get("systemPrompt").and_then(Value::as_str) {
            if !prompt.is_empty() && prompt.len() <= MAX_SYSTEM_PROMPT_LEN {
                next.system_prompt = prompt.to_string();
                applied += 1;
            }
        }

        if let Some(mode) = patch
            .get("attributionMode")
            .and_then(Value::as_str)
            .and_then(AttributionMode::parse)
        {
            next.attribution_mode = mode;
            applied += 1;
        }

        if let Some(lambda) = patch.get("timeDecayLambda").and_then(Value::as_f64) {
            if (0.0..=1.0).contains(&lambda) {
                next.time_decay_lambda = lambda;
                applied += 1;
            }
        }

        if let Some(stage) = patch.get("stageWeights") {
            let before = next.stage_weights.clone();
            patch_weight_map(&mut next.stage_weights, stage, "stageWeights");
            if next.stage_weights != before {
                applied += 1;
            }
        }
        if let Some(source) = patch.get("sourceWeights") {
            let before = next.source_weights.clone();
            patch_weight_map(&mut next.source_weights, source, "sourceWeights");
            if next.source_weights != before {
                applied += 1;
            }
        }

        if applied == 0 {
            tracing::debug!(version = next.version, "config patch applied no fields");
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_matches_documented_values() {
        let config = ScoringConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.attribution_mode, AttributionMode::TimeDecay);
        assert_eq!(config.time_decay_lambda, 0.1);
        assert!(config.system_prompt.starts_with("You are a lead prioritization assistant"));
    }

    #[test]
    fn patch_updates_named_weights_only() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({
            "scoringWeights": { "emailWeight": 1.5, "bogus": 9.0 }
        }));
        assert_eq!(next.version, 2);
        assert_eq!(next.scoring_weights.email_weight, 1.5);
        assert_eq!(next.scoring_weights.chat_weight, 1.0);
    }

    #[test]
    fn invalid_fields_are_dropped_independently() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({
            "attributionMode": "u_shaped",
            "timeDecayLambda": 0.4
        }));
        assert_eq!(next.attribution_mode, AttributionMode::TimeDecay);
        assert_eq!(next.time_decay_lambda, 0.4);
    }

    #[test]
    fn lambda_out_of_range_is_dropped() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({ "timeDecayLambda": 1.5 }));
        assert_eq!(next.time_decay_lambda, 0.1);
    }

    #[test]
    fn oversized_prompt_is_dropped() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({ "systemPrompt": "x".repeat(2001) }));
        assert_eq!(next.system_prompt, DEFAULT_SYSTEM_PROMPT);
        let ok = config.apply_patch(&json!({ "systemPrompt": "Rank by intent." }));
        assert_eq!(ok.system_prompt, "Rank by intent.");
    }

    #[test]
    fn stage_weights_are_clamped() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({
            "stageWeights": { "qualified": 3.0, "prospect": 0.1, "customer": "high" }
        }));
        assert_eq!(next.stage_weights["qualified"], 1.5);
        assert_eq!(next.stage_weights["prospect"], 0.5);
        assert!(!next.stage_weights.contains_key("customer"));
    }

    #[test]
    fn empty_patch_still_bumps_version() {
        let config = ScoringConfig::default();
        let next = config.apply_patch(&json!({}));
        assert_eq!(next.version, 2);
        assert_eq!(next.scoring_weights, config.scoring_weights);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let value = serde_json::to_value(ScoringConfig::default()).unwrap();
        assert!(value.get("scoringWeights").is_some());
        assert!(value.get("attributionMode").is_some());
        assert!(value.get("timeDecayLambda").is_some());
        assert!(value["scoringWeights"].get("recencyDecay").is_some());
    }
}
