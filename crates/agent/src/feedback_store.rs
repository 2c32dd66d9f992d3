//! Append-only in-memory feedback store.

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use lead_engine_core::{FeedbackMetadata, FeedbackOutcome, FeedbackRecord};

#[derive(Default)]
pub struct FeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one feedback event, stamping id and timestamp.
    pub fn add(
        &self,
        lead_id: String,
        outcome_type: FeedbackOutcome,
        recommendation_id: Option<String>,
        metadata: FeedbackMetadata,
    ) -> FeedbackRecord {
        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            lead_id,
            outcome_type,
            recommendation_id,
            metadata,
            timestamp: Utc::now(),
        };
        self.records.write().push(record.clone());
        tracing::debug!(lead_id = %record.lead_id, outcome = ?record.outcome_type, "recorded feedback");
        record
    }

    /// Feedback recorded within the last `days` days.
    pub fn recent(&self, days: i64) -> Vec<FeedbackRecord> {
        let cutoff = Utc::now() - Duration::days(days);
        self.records
            .read()
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
