//! Versioned in-memory store for the scoring config document.
//!
//! Exactly one current config exists at a time. Patches are applied
//! atomically (read current, build successor, publish) under a single write
//! lock, and every published version is appended to a FIFO history capped at
//! five entries. Rollback republishes a historic version verbatim without
//! renumbering it or touching the history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::ScoringConfig;

const MAX_VERSIONS: usize = 5;

/// Summary row returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigVersion {
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

struct StoreInner {
    current: ScoringConfig,
    history: VecDeque<ScoringConfig>,
}

pub struct ConfigStore {
    inner: RwLock<StoreInner>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ConfigStore {
    pub fn new(initial: ScoringConfig) -> Self {
        let mut history = VecDeque::with_capacity(MAX_VERSIONS);
        history.push_back(initial.clone());
        Self {
            inner: RwLock::new(StoreInner {
                current: initial,
                history,
            }),
        }
    }

    /// Snapshot of the current config.
    pub fn current(&self) -> ScoringConfig {
        self.inner.read().current.clone()
    }

    /// Apply a partial patch and publish the successor version.
    pub fn apply_patch(&self, patch: &Value) -> ScoringConfig {
        let mut inner = self.inner.write();
        let next = inner.current.apply_patch(patch);
        inner.current = next.clone();
        inner.history.push_back(next.clone());
        while inner.history.len() > MAX_VERSIONS {
            inner.history.pop_front();
        }
        tracing::info!(version = next.version, "published scoring config");
        next
    }

    pub fn history(&self) -> Vec<ConfigVersion> {
        self.inner
            .read()
            .history
            .iter()
            .map(|c| ConfigVersion {
                version: c.version,
                updated_at: c.updated_at,
            })
            .collect()
    }

    /// Restore a historic version as current. Returns `None` when the
    /// version has been evicted or never existed. The restored config keeps
    /// its original version number and no history entry is appended.
    pub fn rollback(&self, version: u64) -> Option<ScoringConfig> {
        let mut inner = self.inner.write();
        let found = inner.history.iter().find(|c| c.version == version)?.clone();
        inner.current = found.clone();
        tracing::info!(version, "rolled back scoring config");
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_bumps_version_and_appends_history() {
        let store = ConfigStore::default();
        let next = store.apply_patch(&json!({ "timeDecayLambda": 0.3 }));
        assert_eq!(next.version, 2);
        let history = store.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].version, 2);
    }

    #[test]
    fn history_is_capped_at_five_fifo() {
        let store = ConfigStore::default();
        for _ in 0..6 {
            store.apply_patch(&json!({}));
        }
        let history = store.history();
        assert_eq!(history.len(), 5);
        // versions 1 and 2 were evicted oldest-first
        assert_eq!(history[0].version, 3);
        assert_eq!(history[4].version, 7);
    }

    #[test]
    fn rollback_restores_without_renumbering() {
        let store = ConfigStore::default();
        store.apply_patch(&json!({ "timeDecayLambda": 0.5 }));
        store.apply_patch(&json!({ "timeDecayLambda": 0.9 }));

        let restored = store.rollback(2).unwrap();
        assert_eq!(restored.version, 2);
        assert_eq!(restored.time_decay_lambda, 0.5);
        assert_eq!(store.current().version, 2);
        // rollback leaves history untouched
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn rollback_to_evicted_version_fails() {
        let store = ConfigStore::default();
        for _ in 0..6 {
            store.apply_patch(&json!({}));
        }
        assert!(store.rollback(1).is_none());
        assert!(store.rollback(99).is_none());
    }

    #[test]
    fn patch_after_rollback_continues_from_restored_version() {
        let store = ConfigStore::default();
        store.apply_patch(&json!({}));
        store.apply_patch(&json!({}));
        store.rollback(2).unwrap();
        let next = store.apply_patch(&json!({}));
        assert_eq!(next.version, 3);
    }
}
