//! The improve cycle: recent feedback -> learned weights -> config patch.

use serde_json::json;

use lead_engine_config::{ConfigStore, ScoringConfig};
use lead_engine_scoring::{compute_learned_weights, merge_weights};

use crate::feedback_store::FeedbackStore;

const FEEDBACK_WINDOW_DAYS: i64 = 7;

/// Result of one improve cycle.
#[derive(Debug, Clone)]
pub enum ImproveOutcome {
    /// No helpful/not_helpful feedback in the window; config untouched.
    NoFeedback,
    /// Weights were learned, merged and published.
    Updated(ScoringConfig),
}

/// Feed the recent feedback window through the weight learner and publish
/// the merged stage/source weights as a config patch.
pub fn run_improve_cycle(feedback: &FeedbackStore, config_store: &ConfigStore) -> ImproveOutcome {
    let recent = feedback.recent(FEEDBACK_WINDOW_DAYS);
    if recent.is_empty() {
        return ImproveOutcome::NoFeedback;
    }

    let Some(learned) = compute_learned_weights(&recent) else {
        return ImproveOutcome::NoFeedback;
    };

    let current = config_store.current();
    let merged = merge_weights(&current.stage_weights, &current.source_weights, &learned);

    let patch = json!({
        "stageWeights": merged.stage_weights,
        "sourceWeights": merged.source_weights,
    });
    let updated = config_store.apply_patch(&patch);
    tracing::info!(
        version = updated.version,
        records = recent.len(),
        "improve cycle published learned weights"
    );
    ImproveOutcome::Updated(updated)
}
