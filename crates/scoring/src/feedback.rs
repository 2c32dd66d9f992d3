//! Preference learning from thumbs up/down feedback.
//!
//! Bandit-style multiplicative updates: helpful feedback on a stage or
//! source nudges its weight above 1, not-helpful nudges it below, with
//! smoothing against early-sample volatility and a hard clamp to [0.5, 1.5].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lead_engine_core::{FeedbackOutcome, FeedbackRecord};

const LEARNING_RATE: f64 = 0.15;
const SMOOTHING: f64 = 2.0;
const MIN_WEIGHT: f64 = 0.5;
const MAX_WEIGHT: f64 = 1.5;

/// Weights derived from a feedback batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedWeights {
    pub stage_weights: HashMap<String, f64>,
    pub source_weights: HashMap<String, f64>,
}

#[derive(Default)]
struct Tally {
    pos: u32,
    neg: u32,
}

fn learned_from(counts: HashMap<String, Tally>) -> HashMap<String, f64> {
    counts
        .into_iter()
        .map(|(key, tally)| {
            let total = f64::from(tally.pos) + f64::from(tally.neg) + SMOOTHING;
            let delta = (f64::from(tally.pos) - f64::from(tally.neg)) / total;
            let weight = (1.0 + LEARNING_RATE * delta).clamp(MIN_WEIGHT, MAX_WEIGHT);
            (key, weight)
        })
        .collect()
}

/// Compute learned stage and source weights from a feedback batch.
///
/// Returns `None` when the batch contains no helpful/not_helpful records —
/// an explicit nothing-to-learn signal, not an error. Contacted/dismissed
/// outcomes are recorded but do not train weights.
pub fn compute_learned_weights(feedback: &[FeedbackRecord]) -> Option<LearnedWeights> {
    let mut stage_counts: HashMap<String, Tally> = HashMap::new();
    let mut source_counts: HashMap<String, Tally> = HashMap::new();
    let mut any = false;

    for record in feedback {
        let positive = match record.outcome_type {
            FeedbackOutcome::Helpful => true,
            FeedbackOutcome::NotHelpful => false,
            _ => continue,
        };
        any = true;
        if let Some(stage) = record.metadata.stage.as_deref() {
            let tally = stage_counts.entry(stage.to_string()).or_default();
            if positive {
                tally.pos += 1;
            } else {
                tally.neg += 1;
            }
        }
        if let Some(source) = record.metadata.source.as_deref() {
            let tally = source_counts.entry(source.to_string()).or_default();
            if positive {
                tally.pos += 1;
            } else {
                tally.neg += 1;
            }
        }
    }

    if !any {
        return None;
    }

    Some(LearnedWeights {
        stage_weights: learned_from(stage_counts),
        source_weights: learned_from(source_counts),
    })
}

/// Merge newly learned weights over the existing config weights.
///
/// Learned keys overwrite; keys absent from this batch keep their previous
/// value indefinitely. Weights never decay back toward 1 on their own; only
/// new contrary feedback moves them back.
pub fn merge_weights(
    existing_stage: &HashMap<String, f64>,
    existing_source: &HashMap<String, f64>,
    learned: &LearnedWeights,
) -> LearnedWeights {
    let mut stage_weights = existing_stage.clone();
    let mut source_weights = existing_source.clone();
    for (key, value) in &learned.stage_weights {
        stage_weights.insert(key.clone(), *value);
    }
    for (key, value) in &learned.source_weights {
        source_weights.insert(key.clone(), *value);
    }
    LearnedWeights {
        stage_weights,
        source_weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lead_engine_core::FeedbackMetadata;

    fn record(outcome: FeedbackOutcome, stage: Option<&str>, source: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            id: "f".into(),
            lead_id: "l1".into(),
            outcome_type: outcome,
            recommendation_id: None,
            metadata: FeedbackMetadata {
                stage: stage.map(String::from),
                source: source.map(String::from),
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn no_trainable_feedback_is_none() {
        assert!(compute_learned_weights(&[]).is_none());
        let only_contacted = vec![record(FeedbackOutcome::Contacted, Some("qualified"), None)];
        assert!(compute_learned_weights(&only_contacted).is_none());
    }

    #[test]
    fn helpful_feedback_raises_weight() {
        let feedback = vec![
            record(FeedbackOutcome::Helpful, Some("qualified"), None),
            record(FeedbackOutcome::Helpful, Some("qualified"), None),
        ];
        let learned = compute_learned_weights(&feedback).unwrap();
        // delta = 2/4, weight = 1 + 0.15 * 0.5
        assert!((learned.stage_weights["qualified"] - 1.075).abs() < 1e-9);
    }

    #[test]
    fn not_helpful_feedback_lowers_weight() {
        let feedback = vec![
            record(FeedbackOutcome::NotHelpful, None, Some("cold_call")),
            record(FeedbackOutcome::NotHelpful, None, Some("cold_call")),
            record(FeedbackOutcome::NotHelpful, None, Some("cold_call")),
        ];
        let learned = compute_learned_weights(&feedback).unwrap();
        let w = learned.source_weights["cold_call"];
        assert!(w < 1.0);
        assert!(w >= 0.5);
    }

    #[test]
    fn smoothing_dampens_single_sample() {
        let feedback = vec![record(FeedbackOutcome::Helpful, Some("prospect"), None)];
        let learned = compute_learned_weights(&feedback).unwrap();
        // delta = 1/3, adjustment = 0.05
        assert!((learned.stage_weights["prospect"] - 1.05).abs() < 1e-9);
    }

    #[test]
    fn merge_overwrites_learned_keys_and_keeps_others() {
        let mut existing_stage = HashMap::new();
        existing_stage.insert("prospect".to_string(), 0.9);
        existing_stage.insert("customer".to_string(), 1.3);
        let existing_source = HashMap::new();

        let mut learned = LearnedWeights::default();
        learned.stage_weights.insert("prospect".to_string(), 1.1);

        let merged = merge_weights(&existing_stage, &existing_source, &learned);
        assert_eq!(merged.stage_weights["prospect"], 1.1);
        assert_eq!(merged.stage_weights["customer"], 1.3);
    }

    #[test]
    fn weights_stay_inside_clamp() {
        let feedback: Vec<FeedbackRecord> = (0..100)
            .map(|_| record(FeedbackOutcome::Helpful, Some("opportunity"), None))
            .collect();
        let learned = compute_learned_weights(&feedback).unwrap();
        assert!(learned.stage_weights["opportunity"] <= 1.5);
    }
}
