//! Candidate retrieval

use mentionlink_common::errors::Result;
use mentionlink_common::metrics;
use mentionlink_common::store::{Candidate, LookupStore};
use std::sync::Arc;
use tracing::debug;

/// Fetches a bounded candidate list for a mention
#[derive(Clone)]
pub struct CandidateRetriever {
    store: Arc<dyn LookupStore>,
    max_candidates: usize,
}

impl CandidateRetriever {
    pub fn new(store: Arc<dyn LookupStore>, max_candidates: usize) -> Self {
        Self {
            store,
            max_candidates,
        }
    }

    /// Candidates for `mention` in store order, truncated to the limit
    pub fn retrieve(&self, mention: &str) -> Result<Vec<Candidate>> {
        let timer = metrics::LookupTimer::start("candidates");
        let mut candidates = self.store.candidates_for(mention)?;
        timer.finish(!candidates.is_empty());

        let found = candidates.len();
        candidates.truncate(self.max_candidates);

        debug!(mention, found, returned = candidates.len(), "Candidates retrieved");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentionlink_common::store::MemoryLookupStore;

    fn ranked(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("Entity_{}", i), 1.0 / (i + 1) as f32))
            .collect()
    }

    #[test]
    fn test_truncates_to_limit_in_store_order() {
        let store = MemoryLookupStore::new().with_candidates("Paris", ranked(150));
        let retriever = CandidateRetriever::new(Arc::new(store), 100);

        let candidates = retriever.retrieve("Paris").unwrap();
        assert_eq!(candidates.len(), 100);
        assert_eq!(candidates[0].entity, "Entity_0");
        assert_eq!(candidates[99].entity, "Entity_99");
    }

    #[test]
    fn test_short_lists_untouched() {
        let store = MemoryLookupStore::new().with_candidates("Paris", ranked(3));
        let retriever = CandidateRetriever::new(Arc::new(store), 100);
        assert_eq!(retriever.retrieve("Paris").unwrap(), ranked(3));
    }

    #[test]
    fn test_missing_mention_is_empty() {
        let store = MemoryLookupStore::new().with_frequency("Paris", 10);
        let retriever = CandidateRetriever::new(Arc::new(store), 100);
        assert!(retriever.retrieve("Paris").unwrap().is_empty());
        assert!(retriever.retrieve("London").unwrap().is_empty());
    }
}
