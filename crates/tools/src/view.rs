//! Request-scoped view over the leads and interactions of one request.

use std::collections::HashMap;

use lead_engine_core::{Interaction, Lead};

/// Immutable index of the request payload: leads by id, interactions grouped
/// per lead and sorted most recent first.
pub struct LeadDataView {
    leads: HashMap<String, Lead>,
    interactions_by_lead: HashMap<String, Vec<Interaction>>,
}

impl LeadDataView {
    pub fn new(leads: &[Lead], interactions: &[Interaction]) -> Self {
        let leads_map = leads
            .iter()
            .map(|l| (l.id.clone(), l.clone()))
            .collect::<HashMap<_, _>>();

        let mut grouped: HashMap<String, Vec<Interaction>> = HashMap::new();
        for interaction in interactions {
            grouped
                .entry(interaction.lead_id.clone())
                .or_default()
                .push(interaction.clone());
        }
        for list in grouped.values_mut() {
            list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        Self {
            leads: leads_map,
            interactions_by_lead: grouped,
        }
    }

    pub fn lead(&self, lead_id: &str) -> Option<&Lead> {
        self.leads.get(lead_id)
    }

    /// A lead's interactions, most recent first. Unknown leads yield an
    /// empty slice.
    pub fn interactions(&self, lead_id: &str) -> &[Interaction] {
        self.interactions_by_lead
            .get(lead_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lead_engine_core::{InteractionKind, InteractionMetadata, SentimentLabel, Trend};

    fn lead(id: &str) -> Lead {
        Lead {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            company: String::new(),
            position: String::new(),
            engagement_score: 50.0,
            previous_score: None,
            trend: Trend::Stable,
            stage: None,
            source: "web".into(),
            last_interaction: None,
            total_interactions: None,
            ml_score: None,
        }
    }

    fn interaction(id: &str, lead_id: &str, age_days: i64) -> Interaction {
        Interaction {
            id: id.into(),
            lead_id: lead_id.into(),
            kind: InteractionKind::Email,
            content: String::new(),
            sentiment: SentimentLabel::Neutral,
            sentiment_score: 0.0,
            timestamp: Utc::now() - Duration::days(age_days),
            source: "crm".into(),
            metadata: InteractionMetadata::default(),
        }
    }

    #[test]
    fn interactions_are_sorted_recent_first() {
        let view = LeadDataView::new(
            &[lead("l1")],
            &[
                interaction("old", "l1", 10),
                interaction("new", "l1", 1),
                interaction("mid", "l1", 5),
            ],
        );
        let ids: Vec<&str> = view.interactions("l1").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn unknown_lead_has_empty_history() {
        let view = LeadDataView::new(&[lead("l1")], &[]);
        assert!(view.lead("l2").is_none());
        assert!(view.interactions("l2").is_empty());
    }
}
