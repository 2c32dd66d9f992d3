//! Bounded sentiment result cache.
//!
//! Keyed by the Sha256 of the analyzed text, FIFO eviction at 10k entries.
//! Stores the serialized analysis result so both the keyword and the
//! LLM-backed providers can share it.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde_json::Value;
use sha2::{Digest, Sha256};

const MAX_ENTRIES: usize = 10_000;

struct CacheInner {
    entries: HashMap<String, Value>,
    key_order: VecDeque<String>,
}

pub struct SentimentCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
}

impl Default for SentimentCache {
    fn default() -> Self {
        Self::new(MAX_ENTRIES)
    }
}

impl SentimentCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                key_order: VecDeque::new(),
            }),
            max_entries,
        }
    }

    fn content_hash(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, text: &str) -> Option<Value> {
        let key = Self::content_hash(text);
        self.inner.lock().entries.get(&key).cloned()
    }

    /// Insert a result. A key already present is left untouched; the first
    /// stored result for a text wins.
    pub fn insert(&self, text: &str, result: Value) {
        let key = Self::content_hash(text);
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&key) {
            return;
        }
        while inner.entries.len() >= self.max_entries {
            match inner.key_order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.key_order.push_back(key.clone());
        inner.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
