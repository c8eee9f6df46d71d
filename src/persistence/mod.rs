//! Progress persistence
//!
//! The game only needs a tiny key-value store (high score, furthest level
//! unlocked, settings). Hosts plug in their own backend through
//! `KeyValueStore`; `MemoryStore` covers the native demo and tests.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend rejected write to {key}: {reason}")]
    Backend { key: String, reason: String },
}

/// String-keyed string storage (LocalStorage-like)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// Volatile store backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Read a JSON value; `Ok(None)` when the key was never written
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key) {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    store.set(key, json)
}

/// Long-lived player progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub high_score: u64,
    /// Furthest level index the player may start from
    pub unlocked_level: usize,
}

impl Progress {
    const STORAGE_KEY: &'static str = "overheat_progress";

    /// Load progress, starting fresh if nothing (or garbage) is stored
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Progress>(store, Self::STORAGE_KEY) {
            Ok(Some(progress)) => {
                log::info!(
                    "Loaded progress (high score {}, level {} unlocked)",
                    progress.high_score,
                    progress.unlocked_level + 1
                );
                progress
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding unreadable progress: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    /// Keep the best score; returns true on a new record
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Never moves backwards
    pub fn unlock(&mut self, level_index: usize) {
        self.unlocked_level = self.unlocked_level.max(level_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut progress = Progress::default();
        progress.record_score(420);
        progress.unlock(3);
        progress.save(&mut store).unwrap();
        assert_eq!(Progress::load(&store), progress);
    }

    #[test]
    fn test_missing_and_corrupt_fall_back() {
        let mut store = MemoryStore::new();
        assert_eq!(Progress::load(&store), Progress::default());
        store.set(Progress::STORAGE_KEY, "{oops".to_string()).unwrap();
        assert_eq!(Progress::load(&store), Progress::default());
        assert!(matches!(
            load_json::<Progress>(&store, Progress::STORAGE_KEY),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_high_score_and_unlock_only_grow() {
        let mut progress = Progress::default();
        assert!(progress.record_score(100));
        assert!(!progress.record_score(50));
        assert_eq!(progress.high_score, 100);
        progress.unlock(4);
        progress.unlock(2);
        assert_eq!(progress.unlocked_level, 4);
    }
}
