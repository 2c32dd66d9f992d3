//! Recommendation engine for the lead dashboard.
//!
//! The LLM path runs a bounded tool-calling loop grounded in real lead data;
//! the deterministic fallback ranks by attribution-effective score when no
//! model is configured or the model fails. Around them: a TTL'd
//! recommendation cache, the append-only feedback store, and the improve
//! cycle that turns recent feedback into config weight patches.

pub mod cache;
pub mod engine;
pub mod fallback;
pub mod feedback_store;
pub mod improve;
pub mod parser;

pub use cache::RecommendCache;
pub use engine::RecommendationEngine;
pub use fallback::build_recommendations;
pub use feedback_store::FeedbackStore;
pub use improve::{run_improve_cycle, ImproveOutcome};
pub use parser::parse_recommendation_response;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] lead_engine_llm::LlmError),

    #[error("agent did not return valid recommendations JSON")]
    NoRecommendation,
}
