//! Ingestion normalizer.
//!
//! Dashboard payloads are loosely shaped: older clients send `vibeScore`
//! instead of `engagementScore`, stages arrive as free strings, and half the
//! optional fields are simply absent. This module resolves all of that into
//! canonical [`Lead`] records at the boundary so the scoring layers never see
//! a partial lead.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{Lead, Stage, Trend};

const DEFAULT_SCORE: f64 = 50.0;

/// A lead as it may arrive from the dashboard, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLead {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    /// Legacy name for `engagementScore`, still sent by older clients.
    #[serde(default)]
    pub vibe_score: Option<f64>,
    #[serde(default)]
    pub previous_score: Option<f64>,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub last_interaction: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_interactions: Option<u64>,
    #[serde(default)]
    pub ml_score: Option<f64>,
}

impl RawLead {
    /// Resolve the `engagementScore ?? vibeScore ?? 50` chain and bound the
    /// result to [0, 100]; parse the stage leniently.
    pub fn normalize(self) -> Lead {
        let score = self
            .engagement_score
            .or(self.vibe_score)
            .filter(|s| s.is_finite())
            .unwrap_or(DEFAULT_SCORE)
            .clamp(0.0, 100.0);
        let stage = self.stage.as_deref().and_then(Stage::parse);
        if self.stage.is_some() && stage.is_none() {
            tracing::debug!(lead_id = %self.id, stage = ?self.stage, "unknown lead stage");
        }
        Lead {
            id: self.id,
            name: self.name,
            email: self.email,
            company: self.company,
            position: self.position,
            engagement_score: score,
            previous_score: self.previous_score,
            trend: self.trend.unwrap_or_default(),
            stage,
            source: self.source,
            last_interaction: self.last_interaction,
            total_interactions: self.total_interactions,
            ml_score: self.ml_score,
        }
    }
}

/// Normalize a batch of raw lead values, dropping structurally invalid
/// entries with a warning instead of failing the whole request.
pub fn normalize_leads(values: Vec<serde_json::Value>) -> Vec<Lead> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawLead>(value) {
            Ok(raw) => Some(raw.normalize()),
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed lead record");
                None
            }
        })
        .collect()
}
