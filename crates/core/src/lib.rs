//! Core domain types for the lead engine
//!
//! Everything the other crates agree on lives here: the interaction and lead
//! records as they cross the wire, the derived intent/recommendation types,
//! the scoring parameter structs shared between the scoring engine and the
//! versioned config document, and the ingestion normalizer that turns
//! loosely-shaped dashboard payloads into canonical records.

pub mod normalize;
pub mod types;

pub use normalize::{normalize_leads, RawLead};
pub use types::{
    weight_for, AggregatedIntent, AttributionMode, FeedbackMetadata, FeedbackOutcome, FeedbackRecord,
    IntentCategory, IntentCount, IntentSignal, IntentStrength, Interaction, InteractionKind,
    InteractionMetadata, Lead, Recommendations, ScoringWeights, SentimentLabel, SignalSource,
    Stage, Suggestion, TeamMetrics, Trend,
};
