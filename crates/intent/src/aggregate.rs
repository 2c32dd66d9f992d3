//! Per-lead intent aggregation.

use lead_engine_core::{AggregatedIntent, IntentCount, IntentStrength, Interaction};

use crate::extractor::extract_intent;

/// Roll up intent signals across a lead's interaction history.
///
/// Each distinct intent keeps the strength of its first occurrence and a
/// count of how many interactions raised it. Counts order the output
/// (descending, first-seen wins ties).
pub fn aggregate_lead_intent(interactions: &[Interaction]) -> AggregatedIntent {
    let mut counts: Vec<IntentCount> = Vec::new();
    let mut has_high = false;
    let mut has_low = false;

    for interaction in interactions {
        for signal in extract_intent(interaction) {
            match counts.iter_mut().find(|c| c.intent == signal.intent) {
                Some(existing) => existing.count += 1,
                None => counts.push(IntentCount {
                    intent: signal.intent,
                    strength: signal.strength,
                    count: 1,
                }),
            }
            if signal.strength == IntentStrength::High {
                has_high = true;
            }
            if signal.strength == IntentStrength::Low {
                has_low = true;
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    let top_intent = counts.first().map(|c| c.intent);

    let mut summary = if has_high {
        "Strong buying signals (demo, trial, or quote interest)".to_string()
    } else if !counts.is_empty() {
        let names: Vec<String> = counts.iter().take(3).map(|c| c.intent.label()).collect();
        format!("Interest in: {}", names.join(", "))
    } else {
        "No clear intent signals".to_string()
    };
    if has_low {
        summary.push_str("; some hesitation or postponement signals");
    }

    AggregatedIntent {
        signals: counts,
        summary,
        top_intent,
    }
}
