//! TTL cache for recommendation results.
//!
//! Same inputs produce the same recommendations within the TTL window, so
//! the key fingerprints the request: the sorted lead-id set, the team
//! metrics, and the sorted (leadId, id) interaction pairs.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::json;
use sha2::{Digest, Sha256};

use lead_engine_core::{Interaction, Lead, Recommendations, TeamMetrics};

const TTL_MIN_MINUTES: u64 = 5;
const TTL_MAX_MINUTES: u64 = 15;

struct CacheEntry {
    result: Recommendations,
    expires_at: Instant,
}

pub struct RecommendCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl RecommendCache {
    /// TTL is clamped to [5, 15] minutes.
    pub fn new(ttl_minutes: u64) -> Self {
        let clamped = ttl_minutes.clamp(TTL_MIN_MINUTES, TTL_MAX_MINUTES);
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_secs(clamped * 60),
        }
    }

    fn fingerprint(
        leads: &[Lead],
        team_metrics: &TeamMetrics,
        interactions: &[Interaction],
    ) -> String {
        let mut lead_ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        lead_ids.sort_unstable();
        let mut pairs: Vec<(&str, &str)> = interactions
            .iter()
            .map(|i| (i.lead_id.as_str(), i.id.as_str()))
            .collect();
        pairs.sort_unstable();

        let payload = json!({
            "leads": lead_ids,
            "teamMetrics": team_metrics,
            "interactions": pairs,
        });
        let mut hasher = Sha256::new();
        hasher.update(payload.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(
        &self,
        leads: &[Lead],
        team_metrics: &TeamMetrics,
        interactions: &[Interaction],
    ) -> Option<Recommendations> {
        let key = Self::fingerprint(leads, team_metrics, interactions);
        if let Some(entry) = self.entries.get(&key) {
            if Instant::now() <= entry.expires_at {
                return Some(entry.result.clone());
            }
        }
        self.entries.remove(&key);
        None
    }

    pub fn insert(
        &self,
        leads: &[Lead],
        team_metrics: &TeamMetrics,
        interactions: &[Interaction],
        result: Recommendations,
    ) {
        let key = Self::fingerprint(leads, team_metrics, interactions);
        self.entries.insert(
            key,
            CacheEntry {
                result,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_engine_core::Trend;

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

    fn result() -> Recommendations {
        Recommendations {
            prioritized_lead_ids: vec!["l1".into()],
            suggestions: vec![],
            summary: None,
        }
    }

    #[test]
    fn ttl_is_clamped() {
        assert_eq!(RecommendCache::new(1).ttl, Duration::from_secs(5 * 60));
        assert_eq!(RecommendCache::new(10).ttl, Duration::from_secs(10 * 60));
        assert_eq!(RecommendCache::new(120).ttl, Duration::from_secs(15 * 60));
    }

    #[test]
    fn hit_requires_same_lead_set() {
        let cache = RecommendCache::new(10);
        let metrics = TeamMetrics::default();
        cache.insert(&[lead("l1"), lead("l2")], &metrics, &[], result());
        assert!(cache.get(&[lead("l1"), lead("l2")], &metrics, &[]).is_some());
        // lead order is irrelevant, membership is not
        assert!(cache.get(&[lead("l2"), lead("l1")], &metrics, &[]).is_some());
        assert!(cache.get(&[lead("l1")], &metrics, &[]).is_none());
    }

    #[test]
    fn team_metrics_change_misses() {
        let cache = RecommendCache::new(10);
        cache.insert(&[lead("l1")], &TeamMetrics::default(), &[], result());
        let changed = TeamMetrics {
            high_quality_leads: 9,
            ..TeamMetrics::default()
        };
        assert!(cache.get(&[lead("l1")], &changed, &[]).is_none());
    }
}
