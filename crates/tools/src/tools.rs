//! The three lead-data tools.
//!
//! Result shapes mirror what the dashboard's agent protocol expects:
//! camelCase keys, unknown leads answered with
//! `{ "error": "Lead not found", "leadId": ... }`.

use serde_json::{json, Value};

use lead_engine_core::IntentSignal;
use lead_engine_intent::{aggregate_lead_intent, extract_intent};
use lead_engine_llm::ToolSpec;

use crate::registry::AgentTool;
use crate::view::LeadDataView;

const DEFAULT_INTERACTION_LIMIT: usize = 10;
const MAX_CONTENT_CHARS: usize = 500;

fn lead_id_arg(args: &Value) -> Option<&str> {
    args.get("leadId").and_then(Value::as_str)
}

fn lead_not_found(lead_id: Option<&str>) -> Value {
    json!({ "error": "Lead not found", "leadId": lead_id })
}

/// Full details for one lead, including its aggregated intent.
pub struct LeadDetailsTool;

impl AgentTool for LeadDetailsTool {
    fn name(&self) -> &'static str {
        "get_lead_details"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::function(
            self.name(),
            "Get full details for a single lead by ID. Use this to inspect score, stage, company, and contact info before recommending an action.",
            json!({
                "type": "object",
                "properties": {
                    "leadId": { "type": "string", "description": "The lead ID (e.g. lead1, lead2)" }
                },
                "required": ["leadId"]
            }),
        )
    }

    fn execute(&self, view: &LeadDataView, args: &Value) -> Value {
        let lead_id = lead_id_arg(args);
        let Some(lead) = lead_id.and_then(|id| view.lead(id)) else {
            return lead_not_found(lead_id);
        };
        let intent = aggregate_lead_intent(view.interactions(&lead.id));
        json!({
            "id": lead.id,
            "name": lead.name,
            "email": lead.email,
            "company": lead.company,
            "position": lead.position,
            "engagementScore": lead.engagement_score,
            "previousScore": lead.previous_score,
            "trend": lead.trend,
            "stage": lead.stage,
            "source": lead.source,
            "lastInteraction": lead.last_interaction,
            "totalInteractions": lead.total_interactions,
            "intentSignals": intent.signals,
            "intentSummary": intent.summary,
            "topIntent": intent.top_intent,
        })
    }
}

/// Recent interactions for a lead, content truncated, each annotated with
/// its own intent signals.
pub struct RecentInteractionsTool;

impl AgentTool for RecentInteractionsTool {
    fn name(&self) -> &'static str {
        "get_recent_interactions"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::function(
            self.name(),
            "Get recent interactions for a lead (emails, chats, support tickets). Use this to tailor the recommendation based on what was said and sentiment.",
            json!({
                "type": "object",
                "properties": {
                    "leadId": { "type": "string", "description": "The lead ID" },
                    "limit": { "type": "number", "description": "Max number of interactions to return (default 10)", "default": 10 }
                },
                "required": ["leadId"]
            }),
        )
    }

    fn execute(&self, view: &LeadDataView, args: &Value) -> Value {
        let Some(lead_id) = lead_id_arg(args) else {
            return lead_not_found(None);
        };
        let limit = args
            .get("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .unwrap_or(DEFAULT_INTERACTION_LIMIT);

        let recent: Vec<Value> = view
            .interactions(lead_id)
            .iter()
            .take(limit)
            .map(|i| {
                let signals: Vec<IntentSignal> = extract_intent(i);
                let content: String = i.content.chars().take(MAX_CONTENT_CHARS).collect();
                json!({
                    "type": i.kind,
                    "content": content,
                    "sentiment": i.sentiment,
                    "sentimentScore": i.sentiment_score,
                    "timestamp": i.timestamp,
                    "source": i.source,
                    "subject": i.metadata.subject,
                    "intentSignals": signals,
                })
            })
            .collect();

        json!({ "leadId": lead_id, "count": recent.len(), "interactions": recent })
    }
}

/// Aggregated buyer-intent signals for a lead.
pub struct IntentSignalsTool;

impl AgentTool for IntentSignalsTool {
    fn name(&self) -> &'static str {
        "get_intent_signals"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::function(
            self.name(),
            "Get buyer intent signals for a lead (demo request, pricing interest, trial signup, etc.). High-strength signals indicate strong buying interest.",
            json!({
                "type": "object",
                "properties": {
                    "leadId": { "type": "string", "description": "The lead ID" }
                },
                "required": ["leadId"]
            }),
        )
    }

    fn execute(&self, view: &LeadDataView, args: &Value) -> Value {
        let Some(lead_id) = lead_id_arg(args) else {
            return lead_not_found(None);
        };
        let intent = aggregate_lead_intent(view.interactions(lead_id));
        json!({
            "leadId": lead_id,
            "signals": intent.signals,
            "summary": intent.summary,
            "topIntent": intent.top_intent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lead_engine_core::{
        Interaction, InteractionKind, InteractionMetadata, Lead, SentimentLabel, Stage, Trend,
    };

    fn lead(id: &str) -> Lead {
        Lead {
            id: id.into(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            company: "Acme".into(),
            position: "VP Eng".into(),
            engagement_score: 84.0,
            previous_score: Some(70.0),
            trend: Trend::Up,
            stage: Some(Stage::Qualified),
            source: "webinar".into(),
            last_interaction: Some(Utc::now()),
            total_interactions: Some(4),
            ml_score: None,
        }
    }

    fn interaction(id: &str, lead_id: &str, content: &str, age_days: i64) -> Interaction {
        Interaction {
            id: id.into(),
            lead_id: lead_id.into(),
            kind: InteractionKind::Email,
            content: content.into(),
            sentiment: SentimentLabel::Positive,
            sentiment_score: 0.5,
            timestamp: Utc::now() - Duration::days(age_days),
            source: "crm".into(),
            metadata: InteractionMetadata::default(),
        }
    }

    #[test]
    fn lead_details_include_intent_rollup() {
        let view = LeadDataView::new(
            &[lead("l1")],
            &[interaction("i1", "l1", "please schedule a demo", 1)],
        );
        let result = LeadDetailsTool.execute(&view, &json!({ "leadId": "l1" }));
        assert_eq!(result["company"], "Acme");
        assert_eq!(result["engagementScore"], 84.0);
        assert_eq!(result["topIntent"], "demo_request");
        assert_eq!(
            result["intentSummary"],
            "Strong buying signals (demo, trial, or quote interest)"
        );
    }

    #[test]
    fn unknown_lead_is_an_error_value() {
        let view = LeadDataView::new(&[], &[]);
        let result = LeadDetailsTool.execute(&view, &json!({ "leadId": "ghost" }));
        assert_eq!(result["error"], "Lead not found");
        assert_eq!(result["leadId"], "ghost");
    }

    #[test]
    fn recent_interactions_respect_limit_and_truncate() {
        let long_content = "x".repeat(900);
        let view = LeadDataView::new(
            &[lead("l1")],
            &[
                interaction("i1", "l1", &long_content, 3),
                interaction("i2", "l1", "quick question", 2),
                interaction("i3", "l1", "thanks!", 1),
            ],
        );
        let result =
            RecentInteractionsTool.execute(&view, &json!({ "leadId": "l1", "limit": 2 }));
        assert_eq!(result["count"], 2);
        let interactions = result["interactions"].as_array().unwrap();
        // most recent first, limit 2 drops the oldest (long) one
        assert_eq!(interactions[0]["content"], "thanks!");
        // truncation check on a separate full query
        let full = RecentInteractionsTool.execute(&view, &json!({ "leadId": "l1" }));
        let oldest = &full["interactions"].as_array().unwrap()[2];
        assert_eq!(oldest["content"].as_str().unwrap().len(), 500);
    }

    #[test]
    fn intent_signals_cover_full_history() {
        let view = LeadDataView::new(
            &[lead("l1")],
            &[
                interaction("i1", "l1", "what's the pricing?", 2),
                interaction("i2", "l1", "pricing for 100 seats", 1),
            ],
        );
        let result = IntentSignalsTool.execute(&view, &json!({ "leadId": "l1" }));
        assert_eq!(result["leadId"], "l1");
        assert_eq!(result["topIntent"], "pricing_view");
        assert_eq!(result["signals"][0]["count"], 2);
    }

    #[test]
    fn missing_lead_id_argument_is_handled() {
        let view = LeadDataView::new(&[], &[]);
        let result = IntentSignalsTool.execute(&view, &json!({}));
        assert_eq!(result["error"], "Lead not found");
    }
}
