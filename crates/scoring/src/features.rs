//! Logistic feature model for conversion likelihood.
//!
//! A fixed 8-dimensional feature vector (stage one-hot, recency, interaction
//! count, mean sentiment, intent strength) through a linear model and a
//! sigmoid, with each term's contribution reported for explainability.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use lead_engine_core::{IntentStrength, Interaction, Lead};
use lead_engine_intent::extract_intent;

pub const FEATURE_KEYS: [&str; 8] = [
    "stage_prospect",
    "stage_qualified",
    "stage_opportunity",
    "stage_customer",
    "recency",
    "count",
    "sentiment",
    "intent",
];

const SECS_PER_DAY: f64 = 86_400.0;

fn sigmoid(x: f64) -> f64 {
    let t = x.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-t).exp())
}

/// Model weights: bias plus one weight per feature key. Defaults are tuned
/// so untrained scores spread roughly 20-80.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MlWeights {
    pub bias: f64,
    pub stage_prospect: f64,
    pub stage_qualified: f64,
    pub stage_opportunity: f64,
    pub stage_customer: f64,
    pub recency: f64,
    pub count: f64,
    pub sentiment: f64,
    pub intent: f64,
}

impl Default for MlWeights {
    fn default() -> Self {
        Self {
            bias: -0.8,
            stage_prospect: -0.2,
            stage_qualified: 0.1,
            stage_opportunity: 0.4,
            stage_customer: 0.5,
            recency: 0.6,
            count: 0.3,
            sentiment: 0.5,
            intent: 0.8,
        }
    }
}

impl MlWeights {
    fn weight(&self, key: &str) -> f64 {
        match key {
            "stage_prospect" => self.stage_prospect,
            "stage_qualified" => self.stage_qualified,
            "stage_opportunity" => self.stage_opportunity,
            "stage_customer" => self.stage_customer,
            "recency" => self.recency,
            "count" => self.count,
            "sentiment" => self.sentiment,
            "intent" => self.intent,
            _ => 0.0,
        }
    }
}

/// A lead's feature vector, aligned with [`FEATURE_KEYS`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub vec: [f64; 8],
}

/// Extract the fixed feature vector for a lead.
///
/// Recency normalizes as `1/(1 + days_since_last/30)`; a lead with no
/// recorded last interaction counts as contacted now. Count saturates at 20
/// interactions. Sentiment is the mean stored score mapped to [0, 1].
/// Intent strength is 1 when any high signal appears in the history, 0.5 for
/// medium, 0 otherwise.
pub fn extract_features(lead: &Lead, interactions: &[Interaction]) -> FeatureVector {
    let now = Utc::now();
    let recency_days = lead
        .last_interaction
        .map(|ts| (now - ts).num_seconds().max(0) as f64 / SECS_PER_DAY)
        .unwrap_or(0.0);
    let recency_norm = 1.0 / (1.0 + recency_days / 30.0);

    let count = lead
        .total_interactions
        .unwrap_or(interactions.len() as u64) as f64;
    let count_norm = (count / 20.0).min(1.0);

    let avg_sentiment = if interactions.is_empty() {
        0.0
    } else {
        interactions.iter().map(|i| i.sentiment_score).sum::<f64>() / interactions.len() as f64
    };
    let sentiment_norm = (avg_sentiment + 1.0) / 2.0;

    let mut intent_strength = 0.0;
    for interaction in interactions {
        for signal in extract_intent(interaction) {
            match signal.strength {
                IntentStrength::High => {
                    intent_strength = 1.0;
                }
                IntentStrength::Medium if intent_strength < 0.5 => {
                    intent_strength = 0.5;
                }
                _ => {}
            }
        }
        if intent_strength == 1.0 {
            break;
        }
    }

    let mut vec = [0.0; 8];
    if let Some(stage) = lead.stage {
        vec[stage as usize] = 1.0;
    }
    vec[4] = recency_norm;
    vec[5] = count_norm;
    vec[6] = sentiment_norm;
    vec[7] = intent_strength;

    FeatureVector { vec }
}

/// ML score plus per-feature contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScore {
    pub ml_score: f64,
    pub contributions: HashMap<String, f64>,
}

/// One row of a batch scoring response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScoreRow {
    pub lead_id: String,
    pub engagement_score: f64,
    pub ml_score: f64,
    pub feature_contributions: HashMap<String, f64>,
}

/// Score one lead. Contributions are each term's product rounded to two
/// decimals so every score is attributable to its inputs.
pub fn score_lead(lead: &Lead, interactions: &[Interaction], weights: &MlWeights) -> LeadScore {
    let features = extract_features(lead, interactions);
    let mut z = weights.bias;
    let mut contributions = HashMap::with_capacity(FEATURE_KEYS.len());
    for (i, key) in FEATURE_KEYS.iter().enumerate() {
        let term = weights.weight(key) * features.vec[i];
        contributions.insert((*key).to_string(), (term * 100.0).round() / 100.0);
        z += term;
    }
    LeadScore {
        ml_score: (100.0 * sigmoid(z)).round(),
        contributions,
    }
}

/// Batch score, grouping the flat interaction list by lead id.
pub fn score_leads_batch(
    leads: &[Lead],
    interactions: &[Interaction],
    weights: &MlWeights,
) -> Vec<LeadScoreRow> {
    let mut by_lead: HashMap<&str, Vec<&Interaction>> = HashMap::new();
    for interaction in interactions {
        by_lead
            .entry(interaction.lead_id.as_str())
            .or_default()
            .push(interaction);
    }

    leads
        .iter()
        .map(|lead| {
            let own: Vec<Interaction> = by_lead
                .get(lead.id.as_str())
                .map(|refs| refs.iter().map(|i| (*i).clone()).collect())
                .unwrap_or_default();
            let scored = score_lead(lead, &own, weights);
            LeadScoreRow {
                lead_id: lead.id.clone(),
                engagement_score: lead.engagement_score,
                ml_score: scored.ml_score,
                feature_contributions: scored.contributions,
            }
        })
        .collect()
}

/// Feature importance for a linear model is the absolute weight.
pub fn feature_importance(weights: &MlWeights) -> HashMap<String, f64> {
    FEATURE_KEYS
        .iter()
        .map(|key| ((*key).to_string(), weights.weight(key).abs()))
        .collect()
}
