//! In-memory lookup store
//!
//! Holds the `wiki` rows in a hash map. Useful for tests and for small
//! vocabularies exported as a JSON snapshot:
//!
//! ```json
//! { "entries": { "Paris": { "freq": 1200, "candidates": [{"entity": "Paris", "score": 0.9}] } } }
//! ```

use super::{Candidate, LookupStore};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// One row of the `wiki` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WikiEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: HashMap<String, WikiEntry>,
}

/// Hash-map backed lookup store
#[derive(Debug, Clone, Default)]
pub struct MemoryLookupStore {
    entries: HashMap<String, WikiEntry>,
}

impl MemoryLookupStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON snapshot file
    pub fn from_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let store = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            entries = store.len(),
            "Loaded lookup snapshot"
        );

        Ok(store)
    }

    /// Parse a store from snapshot JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        Ok(Self {
            entries: snapshot.entries,
        })
    }

    /// Serialize the store to snapshot JSON
    pub fn to_json(&self) -> Result<String> {
        let snapshot = Snapshot {
            entries: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Number of keys in the store
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a full row
    pub fn insert(&mut self, key: impl Into<String>, entry: WikiEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn with_frequency(mut self, key: impl Into<String>, freq: u64) -> Self {
        self.entries.entry(key.into()).or_default().freq = Some(freq);
        self
    }

    pub fn with_lowercase(mut self, key: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.entries.entry(key.into()).or_default().lower = Some(canonical.into());
        self
    }

    pub fn with_candidates(mut self, key: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        self.entries.entry(key.into()).or_default().candidates = candidates;
        self
    }
}

impl LookupStore for MemoryLookupStore {
    fn frequency_of(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.entries.get(key).and_then(|e| e.freq))
    }

    fn lowercase_canonical_of(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).and_then(|e| e.lower.clone()))
    }

    fn candidates_for(&self, key: &str) -> Result<Vec<Candidate>> {
        Ok(self
            .entries
            .get(key)
            .map(|e| e.candidates.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_store() -> MemoryLookupStore {
        MemoryLookupStore::new()
            .with_frequency("Paris", 1200)
            .with_lowercase("paris", "Paris")
            .with_candidates(
                "Paris",
                vec![
                    Candidate::new("Paris", 0.91),
                    Candidate::new("Paris,_Texas", 0.04),
                ],
            )
    }

    #[test]
    fn test_lookups() {
        let store = sample_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.frequency_of("Paris").unwrap(), Some(1200));
        assert_eq!(store.frequency_of("paris").unwrap(), None);
        assert_eq!(
            store.lowercase_canonical_of("paris").unwrap().as_deref(),
            Some("Paris")
        );
        assert_eq!(store.candidates_for("Paris").unwrap().len(), 2);
        assert!(store.candidates_for("London").unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = sample_store();
        let json = store.to_json().unwrap();
        let restored = MemoryLookupStore::from_json(&json).unwrap();

        assert_eq!(restored.len(), store.len());
        assert_eq!(
            restored.candidates_for("Paris").unwrap(),
            store.candidates_for("Paris").unwrap()
        );
    }

    #[test]
    fn test_from_snapshot_file() {
        let path = std::env::temp_dir().join(format!(
            "mentionlink-snapshot-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"entries": {{"IBM": {{"freq": 50}}, "ibm": {{"lower": "IBM"}}}}}}"#
        )
        .unwrap();
        drop(file);

        let store = MemoryLookupStore::from_snapshot(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.frequency_of("IBM").unwrap(), Some(50));
        assert_eq!(
            store.lowercase_canonical_of("ibm").unwrap().as_deref(),
            Some("IBM")
        );
        assert!(store.candidates_for("IBM").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_snapshot_is_error() {
        assert!(MemoryLookupStore::from_json("{\"entries\": [1, 2]}").is_err());
    }
}
