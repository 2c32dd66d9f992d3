//! Engagement scoring over a lead's interaction history.

use lead_engine_core::{Interaction, ScoringWeights, Trend};

use crate::sentiment::analyze;

const DEFAULT_SCORE: f64 = 50.0;
const TREND_NOISE_FLOOR: f64 = 3.0;

/// Combine sentiment, recency, channel and frequency into a single [0, 100]
/// engagement score. Empty history yields the neutral prior of 50.
///
/// Interactions are expected oldest first; the most recent one carries full
/// recency weight and older ones decay exponentially at `recency_decay` per
/// step. Each interaction's weight is further scaled by its channel weight
/// and by the sentiment confidence of its content.
pub fn calculate_engagement_score(interactions: &[Interaction], weights: &ScoringWeights) -> f64 {
    if interactions.is_empty() {
        return DEFAULT_SCORE;
    }

    let n = interactions.len();
    let mut total = 0.0;
    let mut weighted_sum = 0.0;

    for (i, interaction) in interactions.iter().enumerate() {
        let sentiment = analyze(&interaction.content);
        let recency_weight = (-((n - i - 1) as f64) * weights.recency_decay).exp();
        let type_weight = weights.kind_weight(interaction.kind);

        let normalized = (sentiment.score + 1.0) * 50.0;
        let weight = recency_weight * type_weight * sentiment.confidence;

        total += normalized * weight;
        weighted_sum += weight;
    }

    let average = if weighted_sum > 0.0 {
        total / weighted_sum
    } else {
        DEFAULT_SCORE
    };

    let bonus = (n as f64 * 2.0).min(weights.engagement_bonus_cap);

    (average + bonus).clamp(0.0, 100.0)
}

/// Classify score movement. Changes below the ±3 noise floor are stable.
pub fn score_trend(current: f64, previous: f64) -> Trend {
    let difference = current - previous;
    if difference.abs() < TREND_NOISE_FLOOR {
        Trend::Stable
    } else if difference > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}
