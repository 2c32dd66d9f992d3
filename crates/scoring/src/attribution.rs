//! Multi-touch attribution.
//!
//! Generalizes the engagement scorer's implicit recency policy into four
//! selectable credit models, then applies stage and source multipliers to
//! produce the effective ranking score. The multipliers are how
//! feedback-learned adjustments influence prioritization without touching
//! the stored engagement score.

use std::collections::HashMap;

use chrono::Utc;

use lead_engine_core::{weight_for, AttributionMode, Interaction, Lead};

const SECS_PER_DAY: f64 = 86_400.0;

/// Attribution inputs, borrowed from the current scoring config.
#[derive(Debug, Clone, Copy)]
pub struct AttributionParams<'a> {
    pub mode: AttributionMode,
    pub time_decay_lambda: f64,
    pub stage_weights: &'a HashMap<String, f64>,
    pub source_weights: &'a HashMap<String, f64>,
}

fn normalized_sentiment(interaction: &Interaction) -> f64 {
    (interaction.sentiment_score + 1.0) * 50.0
}

fn base_score(lead: &Lead, interactions: &[Interaction], params: &AttributionParams) -> f64 {
    if interactions.is_empty() {
        return lead.engagement_score;
    }

    match params.mode {
        AttributionMode::FirstTouch => {
            let first = interactions
                .iter()
                .min_by_key(|i| i.timestamp)
                .expect("non-empty");
            normalized_sentiment(first)
        }
        AttributionMode::LastTouch => {
            let last = interactions
                .iter()
                .max_by_key(|i| i.timestamp)
                .expect("non-empty");
            normalized_sentiment(last)
        }
        AttributionMode::Linear => {
            let sum: f64 = interactions.iter().map(normalized_sentiment).sum();
            sum / interactions.len() as f64
        }
        AttributionMode::TimeDecay => {
            let now = Utc::now();
            let mut total = 0.0;
            let mut weight_sum = 0.0;
            for interaction in interactions {
                let age_days = (now - interaction.timestamp).num_seconds().max(0) as f64
                    / SECS_PER_DAY;
                let weight = (-params.time_decay_lambda * age_days).exp();
                total += normalized_sentiment(interaction) * weight;
                weight_sum += weight;
            }
            if weight_sum > 0.0 {
                total / weight_sum
            } else {
                lead.engagement_score
            }
        }
    }
}

/// Effective ranking score for a lead under the configured attribution model,
/// scaled by the learned stage/source multipliers and clamped to [0, 100].
pub fn effective_score(lead: &Lead, interactions: &[Interaction], params: &AttributionParams) -> f64 {
    let base = base_score(lead, interactions, params);
    let stage_weight = lead
        .stage
        .map(|s| weight_for(params.stage_weights, s.as_str()))
        .unwrap_or(1.0);
    let source_weight = weight_for(params.source_weights, &lead.source);
    (base * stage_weight * source_weight).clamp(0.0, 100.0)
}
