//! Per-interaction intent extraction.
//!
//! Three pattern tiers, matched in order: hand-raise (explicit strong
//! interest, high strength), subtle (implicit interest, medium strength,
//! only when the same intent was not already found), and low (negative or
//! postponement signals). A subject-line heuristic backfills demo and
//! pricing intent the body patterns missed.

use once_cell::sync::Lazy;
use regex::Regex;

use lead_engine_core::{IntentCategory, IntentSignal, IntentStrength, Interaction, SignalSource};

struct PatternTier {
    intent: IntentCategory,
    patterns: Vec<Regex>,
}

fn tier(intent: IntentCategory, patterns: &[&str]) -> PatternTier {
    PatternTier {
        intent,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("intent pattern must compile"))
            .collect(),
    }
}

// Hand-raise: explicit strong interest
static HAND_RAISE: Lazy<Vec<PatternTier>> = Lazy::new(|| {
    vec![
        tier(
            IntentCategory::DemoRequest,
            &[
                r"request.*demo",
                r"schedule.*demo",
                r"book.*demo",
                r"demo.*request",
                r"would like.*demo",
                r"interested in.*demo",
            ],
        ),
        tier(
            IntentCategory::TrialSignup,
            &[
                r"start.*trial",
                r"sign up.*trial",
                r"free trial",
                r"try.*free",
                r"trial.*account",
            ],
        ),
        tier(
            IntentCategory::QuoteRequest,
            &[r"request.*quote", r"get.*quote", r"pricing quote", r"send.*quote"],
        ),
        tier(
            IntentCategory::WebinarAttendance,
            &[r"register.*webinar", r"attend.*webinar", r"signed up.*webinar"],
        ),
        tier(
            IntentCategory::ContactRequest,
            &[
                r"contact me",
                r"call me",
                r"reach out",
                r"get in touch",
                r"someone.*contact",
            ],
        ),
    ]
});

// Subtle: implicit interest signals
static SUBTLE: Lazy<Vec<PatternTier>> = Lazy::new(|| {
    vec![
        tier(
            IntentCategory::PricingView,
            &[r"pricing", r"how much", r"cost", r"price", r"budget", r"\$|usd|dollars"],
        ),
        tier(
            IntentCategory::CaseStudy,
            &[r"case study", r"success story", r"customer story", r"similar.*company"],
        ),
        tier(
            IntentCategory::CompetitorResearch,
            &[
                r"compared to",
                r"vs\.?\s+\w+",
                r"alternative to",
                r"instead of",
                r"migration from",
            ],
        ),
        tier(
            IntentCategory::FeatureInquiry,
            &[
                r"tell me more about",
                r"how does.*work",
                r"does it support",
                r"can it.*do",
            ],
        ),
        tier(
            IntentCategory::ImplementationInterest,
            &[r"implementation", r"onboarding", r"setup", r"integration", r"api"],
        ),
    ]
});

// Negative / low-intent signals
static LOW_INTENT: Lazy<Vec<PatternTier>> = Lazy::new(|| {
    vec![
        tier(
            IntentCategory::NotInterested,
            &[r"not interested", r"no thanks", r"remove.*list", r"unsubscribe"],
        ),
        tier(
            IntentCategory::Postpone,
            &[
                r"postpone",
                r"next quarter",
                r"next year",
                r"budget.*constraint",
                r"not.*right now",
            ],
        ),
    ]
});

static SUBJECT_DEMO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"demo|schedule|book").expect("subject pattern must compile"));
static SUBJECT_PRICING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pricing|quote|cost").expect("subject pattern must compile"));

fn has_intent(signals: &[IntentSignal], intent: IntentCategory) -> bool {
    signals.iter().any(|s| s.intent == intent)
}

/// Extract intent signals from a single interaction's content plus its
/// subject and channel metadata.
pub fn extract_intent(interaction: &Interaction) -> Vec<IntentSignal> {
    let mut parts = vec![interaction.content.as_str()];
    if let Some(subject) = interaction.metadata.subject.as_deref() {
        parts.push(subject);
    }
    if let Some(channel) = interaction.metadata.channel.as_deref() {
        parts.push(channel);
    }
    let combined = parts.join(" ");

    let mut signals = Vec::new();

    for tier in HAND_RAISE.iter() {
        if tier.patterns.iter().any(|p| p.is_match(&combined)) {
            signals.push(IntentSignal {
                intent: tier.intent,
                strength: IntentStrength::High,
                source: SignalSource::Content,
            });
        }
    }
    for tier in SUBTLE.iter() {
        if tier.patterns.iter().any(|p| p.is_match(&combined))
            && !has_intent(&signals, tier.intent)
        {
            signals.push(IntentSignal {
                intent: tier.intent,
                strength: IntentStrength::Medium,
                source: SignalSource::Content,
            });
        }
    }
    for tier in LOW_INTENT.iter() {
        if tier.patterns.iter().any(|p| p.is_match(&combined)) {
            signals.push(IntentSignal {
                intent: tier.intent,
                strength: IntentStrength::Low,
                source: SignalSource::Content,
            });
        }
    }

    // Subject-line backfill for signals the body missed.
    if let Some(subject) = interaction.metadata.subject.as_deref() {
        let subj = subject.to_lowercase();
        if SUBJECT_DEMO.is_match(&subj) && !has_intent(&signals, IntentCategory::DemoRequest) {
            signals.push(IntentSignal {
                intent: IntentCategory::DemoRequest,
                strength: IntentStrength::High,
                source: SignalSource::Subject,
            });
        }
        if SUBJECT_PRICING.is_match(&subj) && !has_intent(&signals, IntentCategory::PricingView) {
            signals.push(IntentSignal {
                intent: IntentCategory::PricingView,
                strength: IntentStrength::Medium,
                source: SignalSource::Subject,
            });
        }
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lead_engine_core::{InteractionKind, InteractionMetadata, SentimentLabel};

    fn interaction(content: &str, subject: Option<&str>) -> Interaction {
        Interaction {
            id: "i1".into(),
            lead_id: "l1".into(),
            kind: InteractionKind::Email,
            content: content.into(),
            sentiment: SentimentLabel::Neutral,
            sentiment_score: 0.0,
            timestamp: Utc::now(),
            source: "crm".into(),
            metadata: InteractionMetadata {
                subject: subject.map(String::from),
                channel: None,
                duration: None,
            },
        }
    }

    #[test]
    fn demo_request_is_high_strength() {
        let signals = extract_intent(&interaction("Could we schedule a demo next week?", None));
        assert!(signals.iter().any(|s| {
            s.intent == IntentCategory::DemoRequest && s.strength == IntentStrength::High
        }));
    }

    #[test]
    fn pricing_mention_is_medium_strength() {
        let signals = extract_intent(&interaction("What does the enterprise plan cost?", None));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].intent, IntentCategory::PricingView);
        assert_eq!(signals[0].strength, IntentStrength::Medium);
    }

    #[test]
    fn subject_backfills_demo_intent() {
        let signals = extract_intent(&interaction(
            "Following up on our conversation.",
            Some("Book a slot"),
        ));
        let demo = signals
            .iter()
            .find(|s| s.intent == IntentCategory::DemoRequest)
            .expect("subject heuristic should fire");
        assert_eq!(demo.source, SignalSource::Subject);
    }

    #[test]
    fn subject_does_not_duplicate_body_match() {
        let signals = extract_intent(&interaction(
            "I'd like to request a demo.",
            Some("Demo request"),
        ));
        let demo_count = signals
            .iter()
            .filter(|s| s.intent == IntentCategory::DemoRequest)
            .count();
        assert_eq!(demo_count, 1);
        assert_eq!(signals[0].source, SignalSource::Content);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let signals = extract_intent(&interaction("START MY FREE TRIAL", None));
        assert!(signals
            .iter()
            .any(|s| s.intent == IntentCategory::TrialSignup));
    }

    #[test]
    fn low_intent_detected_alongside_others() {
        let signals = extract_intent(&interaction(
            "Pricing looks fine but let's postpone to next quarter.",
            None,
        ));
        assert!(signals.iter().any(|s| s.intent == IntentCategory::PricingView));
        assert!(signals.iter().any(|s| {
            s.intent == IntentCategory::Postpone && s.strength == IntentStrength::Low
        }));
    }

    #[test]
    fn empty_content_yields_no_signals() {
        assert!(extract_intent(&interaction("", None)).is_empty());
    }
}
