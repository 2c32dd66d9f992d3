//! Deterministic fallback ranker.
//!
//! Used whenever no model backend is configured or the tool loop fails.
//! Leads are ranked by their attribution-effective score (which is how the
//! feedback-learned stage/source weights influence prioritization); leads
//! with no supplied interactions rank by their stored engagement score.

use std::collections::HashMap;

use lead_engine_config::ScoringConfig;
use lead_engine_core::{Interaction, Lead, Recommendations, Suggestion};
use lead_engine_scoring::{effective_score, AttributionParams};

const TOP_N: usize = 10;
const HOT_THRESHOLD: f64 = 80.0;
const COLD_THRESHOLD: f64 = 50.0;

/// Build recommendations without a model: top 10 leads by effective score,
/// with threshold-based actions.
pub fn build_recommendations(
    leads: &[Lead],
    interactions: &[Interaction],
    config: &ScoringConfig,
) -> Recommendations {
    let params = AttributionParams {
        mode: config.attribution_mode,
        time_decay_lambda: config.time_decay_lambda,
        stage_weights: &config.stage_weights,
        source_weights: &config.source_weights,
    };

    let mut by_lead: HashMap<&str, Vec<Interaction>> = HashMap::new();
    for interaction in interactions {
        by_lead
            .entry(interaction.lead_id.as_str())
            .or_default()
            .push(interaction.clone());
    }

    let mut ranked: Vec<(&Lead, f64)> = leads
        .iter()
        .map(|lead| {
            let own = by_lead.get(lead.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            (lead, effective_score(lead, own, &params))
        })
        .collect();
    ranked.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.last_interaction.cmp(&a.last_interaction))
    });

    let top = &ranked[..ranked.len().min(TOP_N)];
    let prioritized_lead_ids: Vec<String> = top.iter().map(|(l, _)| l.id.clone()).collect();

    let suggestions: Vec<Suggestion> = top
        .iter()
        .map(|(lead, score)| {
            let (action, reason) = if *score >= HOT_THRESHOLD {
                (
                    "Schedule call or demo".to_string(),
                    "High engagement – prioritize conversion".to_string(),
                )
            } else if *score < COLD_THRESHOLD {
                (
                    "Nurture with content or check-in".to_string(),
                    "Lower engagement – re-engage".to_string(),
                )
            } else {
                (
                    "Send follow-up email".to_string(),
                    format!("Lead score {}", score.round() as i64),
                )
            };
            Suggestion {
                lead_id: lead.id.clone(),
                action,
                reason,
            }
        })
        .collect();

    let summary = format!(
        "Top {} leads to contact by engagement score.",
        prioritized_lead_ids.len()
    );

    Recommendations {
        prioritized_lead_ids,
        suggestions,
        summary: Some(summary),
    }
}
