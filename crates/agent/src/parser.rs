//! Lenient parsing of the model's final recommendation message.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use lead_engine_core::{Recommendations, Suggestion};

// First `{` through last `}` of the reply; models often wrap the JSON in
// prose or code fences.
static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json block pattern must compile"));

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Extract a [`Recommendations`] from free-form model output.
///
/// Missing `prioritizedLeadIds` falls back to the suggestion order; a
/// suggestion without an action defaults to "Follow up"; suggestions without
/// any lead id are dropped. Returns `None` when no parseable JSON object is
/// present.
pub fn parse_recommendation_response(content: &str) -> Option<Recommendations> {
    let block = JSON_BLOCK.find(content.trim())?;
    let parsed: Value = serde_json::from_str(block.as_str()).ok()?;

    let suggestions: Vec<Suggestion> = parsed
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|s| {
                    let lead_id = string_field(s, "leadId").or_else(|| string_field(s, "lead_id"))?;
                    Some(Suggestion {
                        lead_id: lead_id.to_string(),
                        action: string_field(s, "action").unwrap_or("Follow up").to_string(),
                        reason: string_field(s, "reason").unwrap_or_default().to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let prioritized_lead_ids: Vec<String> = parsed
        .get("prioritizedLeadIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_else(|| suggestions.iter().map(|s| s.lead_id.clone()).collect());

    Some(Recommendations {
        prioritized_lead_ids,
        suggestions,
        summary: string_field(&parsed, "summary").map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let content = r#"{"prioritizedLeadIds":["l2","l1"],"suggestions":[{"leadId":"l2","action":"Call","reason":"High intent"}],"summary":"Call l2 first."}"#;
        let parsed = parse_recommendation_response(content).unwrap();
        assert_eq!(parsed.prioritized_lead_ids, vec!["l2", "l1"]);
        assert_eq!(parsed.suggestions[0].action, "Call");
        assert_eq!(parsed.summary.as_deref(), Some("Call l2 first."));
    }

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let content = "Here are my recommendations:\n```json\n{\"suggestions\":[{\"leadId\":\"l1\"}]}\n```\nLet me know.";
        let parsed = parse_recommendation_response(content).unwrap();
        assert_eq!(parsed.suggestions[0].lead_id, "l1");
    }

    #[test]
    fn missing_priorities_fall_back_to_suggestion_order() {
        let content = r#"{"suggestions":[{"leadId":"l3"},{"lead_id":"l1"}]}"#;
        let parsed = parse_recommendation_response(content).unwrap();
        assert_eq!(parsed.prioritized_lead_ids, vec!["l3", "l1"]);
        assert_eq!(parsed.suggestions[1].action, "Follow up");
        assert_eq!(parsed.suggestions[1].reason, "");
    }

    #[test]
    fn suggestions_without_lead_id_are_dropped() {
        let content = r#"{"suggestions":[{"action":"Call"},{"leadId":"l1"}]}"#;
        let parsed = parse_recommendation_response(content).unwrap();
        assert_eq!(parsed.suggestions.len(), 1);
    }

    #[test]
    fn non_json_content_is_none() {
        assert!(parse_recommendation_response("I could not decide.").is_none());
        assert!(parse_recommendation_response("").is_none());
    }

    #[test]
    fn malformed_json_is_none() {
        assert!(parse_recommendation_response("{\"suggestions\": [").is_none());
    }
}
