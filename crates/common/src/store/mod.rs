//! Lookup store layer for MentionLink
//!
//! Provides:
//! - The `LookupStore` trait with one method per lookup contract
//! - An in-memory backend (tests, JSON snapshots)
//! - A SeaORM backend over the generated `wiki` table
//! - A factory that opens whichever backend is configured

mod memory;
pub mod models;
mod sql;

pub use memory::{MemoryLookupStore, WikiEntry};
pub use sql::SqlLookupStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Table every lookup is made against
pub const WIKI_TABLE: &str = "wiki";

/// A possible entity match for a mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Entity identifier (e.g. a Wikipedia title)
    pub entity: String,

    /// Prior score as stored, typically p(entity | mention)
    pub score: f32,
}

impl Candidate {
    pub fn new(entity: impl Into<String>, score: f32) -> Self {
        Self {
            entity: entity.into(),
            score,
        }
    }
}

/// Read-only access to the frequency/candidate database.
///
/// Absent keys are `Ok(None)` or an empty vector; `Err` is reserved for
/// failures of the store itself.
pub trait LookupStore: Send + Sync {
    /// How often `key` occurs as an anchor text
    fn frequency_of(&self, key: &str) -> Result<Option<u64>>;

    /// Canonical casing registered for a lowercased key
    fn lowercase_canonical_of(&self, key: &str) -> Result<Option<String>>;

    /// Candidate entities for `key`, in store order
    fn candidates_for(&self, key: &str) -> Result<Vec<Candidate>>;
}

/// Open the store described by configuration
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn LookupStore>> {
    match config.backend {
        StoreBackend::Memory => {
            let store = match config.snapshot_path.as_deref() {
                Some(path) => MemoryLookupStore::from_snapshot(path)?,
                None => {
                    info!("No snapshot configured, starting with an empty memory store");
                    MemoryLookupStore::new()
                }
            };
            Ok(Arc::new(store))
        }
        StoreBackend::Sql => {
            let url = config.url.as_deref().ok_or_else(|| AppError::Configuration {
                message: "store.url is required for the sql backend".to_string(),
            })?;
            Ok(Arc::new(SqlLookupStore::connect(url, config)?))
        }
    }
}
