//! Integration tests for the tool-calling recommendation loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use lead_engine_agent::{AgentError, RecommendationEngine};
use lead_engine_config::ScoringConfig;
use lead_engine_core::{
    Interaction, InteractionKind, InteractionMetadata, Lead, SentimentLabel, Stage, TeamMetrics,
    Trend,
};
use lead_engine_llm::{
    ChatBackend, ChatMessage, ChatOptions, ChatRole, LlmError, ToolCallFunction, ToolCallRequest,
};
use lead_engine_tools::create_default_registry;

/// Scripted backend: replays a fixed sequence of replies and records the
/// transcript it was given on the final call.
struct ScriptedBackend {
    replies: Vec<ChatMessage>,
    calls: AtomicUsize,
    last_transcript: parking_lot::Mutex<Vec<ChatMessage>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            last_transcript: parking_lot::Mutex::new(Vec::new()),
        }
    }

    fn tool_call_reply(name: &str, args: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Assistant,
            content: None,
            tool_calls: Some(vec![ToolCallRequest {
                id: format!("call_{name}"),
                kind: "function".to_string(),
                function: ToolCallFunction {
                    name: name.to_string(),
                    arguments: args.to_string(),
                },
            }]),
            tool_call_id: None,
        }
    }

    fn final_reply(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Assistant,
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _options: &ChatOptions,
    ) -> Result<ChatMessage, LlmError> {
        *self.last_transcript.lock() = messages.to_vec();
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .get(index.min(self.replies.len() - 1))
            .cloned()
            .expect("script not empty");
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn lead(id: &str, score: f64) -> Lead {
    Lead {
        id: id.into(),
        name: "Lead".into(),
        email: String::new(),
        company: "Acme".into(),
        position: String::new(),
        engagement_score: score,
        previous_score: None,
        trend: Trend::Stable,
        stage: Some(Stage::Qualified),
        source: "web".into(),
        last_interaction: Some(Utc::now()),
        total_interactions: Some(2),
        ml_score: None,
    }
}

fn interaction(id: &str, lead_id: &str, content: &str) -> Interaction {
    Interaction {
        id: id.into(),
        lead_id: lead_id.into(),
        kind: InteractionKind::Email,
        content: content.into(),
        sentiment: SentimentLabel::Positive,
        sentiment_score: 0.4,
        timestamp: Utc::now(),
        source: "crm".into(),
        metadata: InteractionMetadata::default(),
    }
}

#[tokio::test]
async fn tool_round_feeds_results_back_to_the_model() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ScriptedBackend::tool_call_reply("get_intent_signals", r#"{"leadId":"l1"}"#),
        ScriptedBackend::final_reply(
            r#"{"prioritizedLeadIds":["l1"],"suggestions":[{"leadId":"l1","action":"Call","reason":"Demo requested"}],"summary":"Call l1."}"#,
        ),
    ]));
    let engine = RecommendationEngine::new(backend.clone(), create_default_registry());

    let result = engine
        .recommend(
            &[lead("l1", 80.0)],
            &[interaction("i1", "l1", "please schedule a demo")],
            &TeamMetrics::default(),
            &ScoringConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.prioritized_lead_ids, vec!["l1"]);
    assert_eq!(result.suggestions[0].action, "Call");

    // The second call's transcript must contain the assistant's tool call
    // and a tool message answering it with real intent data.
    let transcript = backend.last_transcript.lock();
    let tool_msg = transcript
        .iter()
        .find(|m| m.role == ChatRole::Tool)
        .expect("tool result in transcript");
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_get_intent_signals"));
    let payload: serde_json::Value =
        serde_json::from_str(tool_msg.content.as_deref().unwrap()).unwrap();
    assert_eq!(payload["topIntent"], "demo_request");
}

#[tokio::test]
async fn unknown_tool_yields_error_result_and_loop_continues() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ScriptedBackend::tool_call_reply("fetch_emails", r#"{"leadId":"l1"}"#),
        ScriptedBackend::final_reply(r#"{"suggestions":[{"leadId":"l1"}]}"#),
    ]));
    let engine = RecommendationEngine::new(backend.clone(), create_default_registry());

    let result = engine
        .recommend(&[lead("l1", 70.0)], &[], &TeamMetrics::default(), &ScoringConfig::default())
        .await
        .unwrap();
    assert_eq!(result.suggestions[0].lead_id, "l1");

    let transcript = backend.last_transcript.lock();
    let tool_msg = transcript.iter().find(|m| m.role == ChatRole::Tool).unwrap();
    let payload: serde_json::Value =
        serde_json::from_str(tool_msg.content.as_deref().unwrap()).unwrap();
    assert_eq!(payload["error"], "Unknown tool");
}

#[tokio::test]
async fn round_cap_stops_a_tool_hungry_model() {
    // Always asks for another tool; must fail after the cap, not hang.
    let backend = Arc::new(ScriptedBackend::new(vec![ScriptedBackend::tool_call_reply(
        "get_lead_details",
        r#"{"leadId":"l1"}"#,
    )]));
    let engine =
        RecommendationEngine::new(backend, create_default_registry()).with_max_rounds(3);

    let err = engine
        .recommend(&[lead("l1", 70.0)], &[], &TeamMetrics::default(), &ScoringConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::NoRecommendation));
}

#[tokio::test]
async fn unparseable_final_reply_is_an_error() {
    let backend = Arc::new(ScriptedBackend::new(vec![ScriptedBackend::final_reply(
        "I suggest contacting the most engaged leads first.",
    )]));
    let engine = RecommendationEngine::new(backend, create_default_registry());

    let err = engine
        .recommend(&[lead("l1", 70.0)], &[], &TeamMetrics::default(), &ScoringConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::NoRecommendation));
}
