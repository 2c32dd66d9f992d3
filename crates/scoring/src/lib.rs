//! Scoring core for the lead engine.
//!
//! Pure functions over immutable inputs: keyword sentiment analysis,
//! engagement scoring with recency/type/confidence weighting, multi-touch
//! attribution, a logistic feature model with per-feature contributions, and
//! the feedback weight learner. The only stateful piece is the bounded
//! sentiment result cache.

pub mod attribution;
pub mod cache;
pub mod engagement;
pub mod features;
pub mod feedback;
pub mod sentiment;

pub use attribution::{effective_score, AttributionParams};
pub use cache::SentimentCache;
pub use engagement::{calculate_engagement_score, score_trend};
pub use features::{
    extract_features, feature_importance, score_lead, score_leads_batch, FeatureVector,
    LeadScore, LeadScoreRow, MlWeights,
};
pub use feedback::{compute_learned_weights, merge_weights, LearnedWeights};
pub use sentiment::{analyze, SentimentResult};
