//! Wire-facing domain types.
//!
//! Field names follow the dashboard's JSON contract (camelCase), enum values
//! its snake_case string unions. Derived types (intent signals, aggregates,
//! recommendations) are computed per request and never persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel an interaction arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Email,
    Chat,
    SupportTicket,
    Call,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Email => "email",
            InteractionKind::Chat => "chat",
            InteractionKind::SupportTicket => "support_ticket",
            InteractionKind::Call => "call",
        }
    }
}

/// Ternary sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

/// Optional free-form attributes attached to an interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// A single CRM touch: one email, chat message, ticket or call record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub lead_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sentiment: SentimentLabel,
    /// Stored sentiment in [-1, 1]; 0 when the producer supplied none.
    #[serde(default)]
    pub sentiment_score: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub metadata: InteractionMetadata,
}

/// Lifecycle stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prospect,
    Qualified,
    Opportunity,
    Customer,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prospect => "prospect",
            Stage::Qualified => "qualified",
            Stage::Opportunity => "opportunity",
            Stage::Customer => "customer",
        }
    }

    /// Lenient parse used at the ingestion boundary; anything unrecognized
    /// maps to `None` and contributes nothing to stage-sensitive features.
    pub fn parse(value: &str) -> Option<Stage> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prospect" => Some(Stage::Prospect),
            "qualified" => Some(Stage::Qualified),
            "opportunity" => Some(Stage::Opportunity),
            "customer" => Some(Stage::Customer),
            _ => None,
        }
    }
}

/// Score movement relative to the previous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

/// A canonical lead as the engine sees it after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    /// Bounded engagement score in [0, 100].
    pub engagement_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<f64>,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_interactions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_score: Option<f64>,
}

/// Aggregate pipeline numbers the dashboard passes alongside leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetrics {
    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub average_engagement_score: f64,
    #[serde(default)]
    pub high_quality_leads: u64,
    #[serde(default)]
    pub score_improvement: f64,
    #[serde(default)]
    pub interactions_today: u64,
    #[serde(default)]
    pub conversion_rate: f64,
}

/// Buyer-intent categories the extractor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    DemoRequest,
    TrialSignup,
    QuoteRequest,
    WebinarAttendance,
    ContactRequest,
    PricingView,
    CaseStudy,
    CompetitorResearch,
    FeatureInquiry,
    ImplementationInterest,
    NotInterested,
    Postpone,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::DemoRequest => "demo_request",
            IntentCategory::TrialSignup => "trial_signup",
            IntentCategory::QuoteRequest => "quote_request",
            IntentCategory::WebinarAttendance => "webinar_attendance",
            IntentCategory::ContactRequest => "contact_request",
            IntentCategory::PricingView => "pricing_view",
            IntentCategory::CaseStudy => "case_study",
            IntentCategory::CompetitorResearch => "competitor_research",
            IntentCategory::FeatureInquiry => "feature_inquiry",
            IntentCategory::ImplementationInterest => "implementation_interest",
            IntentCategory::NotInterested => "not_interested",
            IntentCategory::Postpone => "postpone",
        }
    }

    /// Human-readable form used in summaries ("demo request").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// How strong a signal is, by extraction tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStrength {
    Low,
    Medium,
    High,
}

/// Where in the interaction the signal was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Content,
    Subject,
}

/// One detected buyer-intent signal. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSignal {
    pub intent: IntentCategory,
    pub strength: IntentStrength,
    pub source: SignalSource,
}

/// A distinct intent with its occurrence count across a lead's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentCount {
    pub intent: IntentCategory,
    pub strength: IntentStrength,
    pub count: u32,
}

/// Per-lead rollup of intent signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedIntent {
    pub signals: Vec<IntentCount>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_intent: Option<IntentCategory>,
}

/// What a user did with a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Helpful,
    NotHelpful,
    Contacted,
    Dismissed,
}

/// Lead attributes captured alongside feedback, used for weight learning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One recorded piece of recommendation feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub lead_id: String,
    pub outcome_type: FeedbackOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_id: Option<String>,
    #[serde(default)]
    pub metadata: FeedbackMetadata,
    pub timestamp: DateTime<Utc>,
}

/// One per-lead contact suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub lead_id: String,
    pub action: String,
    pub reason: String,
}

/// The recommendation payload returned to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub prioritized_lead_ids: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Tunable weights for the engagement scorer. Part of the versioned
/// scoring config document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Per-step exponential decay applied to older interactions.
    #[serde(default = "defaults::recency_decay")]
    pub recency_decay: f64,
    #[serde(default = "defaults::email_weight")]
    pub email_weight: f64,
    #[serde(default = "defaults::chat_weight")]
    pub chat_weight: f64,
    #[serde(default = "defaults::support_weight")]
    pub support_weight: f64,
    /// Cap on the interaction-count bonus added to the weighted mean.
    #[serde(default = "defaults::engagement_bonus_cap")]
    pub engagement_bonus_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            recency_decay: defaults::recency_decay(),
            email_weight: defaults::email_weight(),
            chat_weight: defaults::chat_weight(),
            support_weight: defaults::support_weight(),
            engagement_bonus_cap: defaults::engagement_bonus_cap(),
        }
    }
}

impl ScoringWeights {
    /// Channel weight for one interaction kind.
    pub fn kind_weight(&self, kind: InteractionKind) -> f64 {
        match kind {
            InteractionKind::Email => self.email_weight,
            InteractionKind::Chat => self.chat_weight,
            InteractionKind::SupportTicket | InteractionKind::Call => self.support_weight,
        }
    }
}

mod defaults {
    pub fn recency_decay() -> f64 {
        0.1
    }
    pub fn email_weight() -> f64 {
        1.2
    }
    pub fn chat_weight() -> f64 {
        1.0
    }
    pub fn support_weight() -> f64 {
        0.8
    }
    pub fn engagement_bonus_cap() -> f64 {
        20.0
    }
}

/// Multi-touch attribution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMode {
    FirstTouch,
    LastTouch,
    Linear,
    #[default]
    TimeDecay,
}

impl AttributionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributionMode::FirstTouch => "first_touch",
            AttributionMode::LastTouch => "last_touch",
            AttributionMode::Linear => "linear",
            AttributionMode::TimeDecay => "time_decay",
        }
    }

    pub fn parse(value: &str) -> Option<AttributionMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first_touch" => Some(AttributionMode::FirstTouch),
            "last_touch" => Some(AttributionMode::LastTouch),
            "linear" => Some(AttributionMode::Linear),
            "time_decay" => Some(AttributionMode::TimeDecay),
            _ => None,
        }
    }
}

/// Stage multiplier lookup with neutral fallback for unknown keys.
pub fn weight_for(map: &HashMap<String, f64>, key: &str) -> f64 {
    map.get(key).copied().unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_round_trips_with_wire_names() {
        let json = serde_json::json!({
            "id": "i1",
            "leadId": "l1",
            "type": "support_ticket",
            "content": "the export keeps failing",
            "sentiment": "negative",
            "sentimentScore": -0.4,
            "timestamp": "2026-03-01T12:00:00Z",
            "source": "zendesk",
            "metadata": { "subject": "Export broken" }
        });
        let interaction: Interaction = serde_json::from_value(json).unwrap();
        assert_eq!(interaction.kind, InteractionKind::SupportTicket);
        assert_eq!(interaction.sentiment, SentimentLabel::Negative);
        assert_eq!(interaction.metadata.subject.as_deref(), Some("Export broken"));

        let back = serde_json::to_value(&interaction).unwrap();
        assert_eq!(back["leadId"], "l1");
        assert_eq!(back["type"], "support_ticket");
        assert_eq!(back["sentimentScore"], -0.4);
    }

    #[test]
    fn interaction_defaults_fill_missing_fields() {
        let json = serde_json::json!({
            "id": "i2",
            "leadId": "l1",
            "type": "chat",
            "timestamp": "2026-03-01T12:00:00Z"
        });
        let interaction: Interaction = serde_json::from_value(json).unwrap();
        assert_eq!(interaction.sentiment, SentimentLabel::Neutral);
        assert_eq!(interaction.sentiment_score, 0.0);
        assert!(interaction.content.is_empty());
    }

    #[test]
    fn stage_parse_is_lenient() {
        assert_eq!(Stage::parse(" Qualified "), Some(Stage::Qualified));
        assert_eq!(Stage::parse("CUSTOMER"), Some(Stage::Customer));
        assert_eq!(Stage::parse("mql"), None);
    }

    #[test]
    fn attribution_mode_rejects_unknown() {
        assert_eq!(AttributionMode::parse("time_decay"), Some(AttributionMode::TimeDecay));
        assert_eq!(AttributionMode::parse("u_shaped"), None);
    }

    #[test]
    fn scoring_weights_default_to_tuned_values() {
        let w = ScoringWeights::default();
        assert_eq!(w.recency_decay, 0.1);
        assert_eq!(w.kind_weight(InteractionKind::Email), 1.2);
        assert_eq!(w.kind_weight(InteractionKind::Call), 0.8);
        assert_eq!(w.engagement_bonus_cap, 20.0);
    }

    #[test]
    fn intent_label_replaces_underscores() {
        assert_eq!(IntentCategory::DemoRequest.label(), "demo request");
        assert_eq!(IntentCategory::CompetitorResearch.label(), "competitor research");
    }
}
