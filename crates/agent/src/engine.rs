//! Tool-calling recommendation loop.

use std::sync::Arc;

use serde_json::{json, Value};

use lead_engine_config::ScoringConfig;
use lead_engine_core::{Interaction, Lead, Recommendations, TeamMetrics};
use lead_engine_llm::{ChatBackend, ChatMessage, ChatOptions};
use lead_engine_tools::{LeadDataView, ToolRegistry};

use crate::parser::parse_recommendation_response;
use crate::AgentError;

const MAX_ROUNDS: usize = 10;

const TOOL_GUIDANCE: &str = " You have access to get_lead_details(leadId), get_recent_interactions(leadId), and get_intent_signals(leadId). Use intent signals to prioritize leads with strong buying interest. End by returning the JSON object only.";

/// Runs the bounded tool loop: the model inspects leads through the
/// registry's tools, then must answer with one JSON recommendations object.
pub struct RecommendationEngine {
    backend: Arc<dyn ChatBackend>,
    registry: ToolRegistry,
    max_rounds: usize,
}

impl RecommendationEngine {
    pub fn new(backend: Arc<dyn ChatBackend>, registry: ToolRegistry) -> Self {
        Self {
            backend,
            registry,
            max_rounds: MAX_ROUNDS,
        }
    }

    /// Override the tool-round cap (mainly for tests).
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    fn lead_summary(leads: &[Lead]) -> Value {
        leads
            .iter()
            .map(|l| {
                json!({
                    "id": l.id,
                    "name": l.name,
                    "company": l.company,
                    "engagementScore": l.engagement_score,
                    "stage": l.stage,
                    "trend": l.trend,
                })
            })
            .collect()
    }

    fn build_user_message(leads: &[Lead], team_metrics: &TeamMetrics) -> ChatMessage {
        let team = serde_json::to_value(team_metrics).unwrap_or_else(|_| json!({}));
        let summary = Self::lead_summary(leads);
        ChatMessage::user(format!(
            "You are given a list of {count} leads. Use the tools get_lead_details(leadId), \
             get_recent_interactions(leadId), and get_intent_signals(leadId) to inspect the leads. \
             Consider buyer intent signals (demo request, pricing interest, trial signup = high intent; \
             pricing_view, case_study = medium intent) when prioritizing. Base recommendations on \
             scores, stage, interaction content, sentiment, and intent. Team context: {team}. \
             Lead summary: {summary}. Respond with a single JSON object: \
             {{ \"prioritizedLeadIds\": [\"id1\", \"id2\", ...], \"suggestions\": [ {{ \"leadId\": \"id1\", \
             \"action\": \"...\", \"reason\": \"...\" }}, ... ], \"summary\": \"Brief sentence.\" }}",
            count = leads.len(),
        ))
    }

    /// Run the loop. Tool rounds feed JSON results back to the model; the
    /// first non-tool reply is parsed and returned. Exceeding the round cap
    /// or an unparseable final reply is [`AgentError::NoRecommendation`].
    pub async fn recommend(
        &self,
        leads: &[Lead],
        interactions: &[Interaction],
        team_metrics: &TeamMetrics,
        config: &ScoringConfig,
    ) -> Result<Recommendations, AgentError> {
        let view = LeadDataView::new(leads, interactions);
        let options = ChatOptions {
            temperature: None,
            json_response: false,
            tools: Some(self.registry.specs()),
        };

        let mut messages = vec![
            ChatMessage::system(format!("{}{}", config.system_prompt, TOOL_GUIDANCE)),
            Self::build_user_message(leads, team_metrics),
        ];

        for round in 0..self.max_rounds {
            let reply = self.backend.chat(&messages, &options).await?;

            if let Some(calls) = reply.tool_calls.clone().filter(|c| !c.is_empty()) {
                tracing::debug!(round, calls = calls.len(), "model requested tools");
                messages.push(reply);
                for call in calls {
                    let args: Value = serde_json::from_str(&call.function.arguments)
                        .unwrap_or_else(|_| json!({}));
                    let result = self.registry.execute(&view, &call.function.name, &args);
                    messages.push(ChatMessage::tool(call.id, result.to_string()));
                }
                continue;
            }

            if let Some(content) = reply.content.as_deref() {
                if let Some(parsed) = parse_recommendation_response(content) {
                    return Ok(parsed);
                }
                tracing::warn!(round, "model reply had no parseable recommendations");
            }
            break;
        }

        Err(AgentError::NoRecommendation)
    }
}
