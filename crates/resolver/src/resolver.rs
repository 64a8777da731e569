//! MentionContextResolver
//!
//! Ties the context extractor, normalizer and candidate retriever to one
//! lookup store, memoizing normalization and candidate lookups per instance.
//! Memoizing calls take `&mut self`; share a resolver across threads only
//! behind a lock.

use crate::cache::{CacheStats, MemoCache};
use crate::candidates::CandidateRetriever;
use crate::context::{Context, ContextWindowExtractor, MentionSpan};
use crate::document::DocumentInput;
use crate::normalizer::{MentionNormalizer, NormalizedMention, Resolution};
use mentionlink_common::config::ResolverConfig;
use mentionlink_common::errors::{AppError, Result};
use mentionlink_common::store::{Candidate, LookupStore};
use mentionlink_common::text::{CaseNormalizer, TitleCaseNormalizer, Tokenizer, WordTokenizer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Everything the pipeline knows about one mention
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMention {
    /// Mention text as it appears in the sentence
    pub text: String,
    pub sentence_index: usize,
    pub span: MentionSpan,
    /// Key used for the candidate lookup
    pub normalized: String,
    pub resolution: Resolution,
    pub context: Context,
    pub candidates: Vec<Candidate>,
}

/// Cache counters for both memoized operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolverCacheStats {
    pub mentions: CacheStats,
    pub candidates: CacheStats,
}

/// Entry point for mention preprocessing
pub struct MentionContextResolver {
    extractor: ContextWindowExtractor,
    normalizer: MentionNormalizer,
    retriever: CandidateRetriever,
    mention_cache: MemoCache<NormalizedMention>,
    candidate_cache: MemoCache<Vec<Candidate>>,
}

impl MentionContextResolver {
    /// Create a resolver with the default tokenizer and case normalizer
    pub fn new(store: Arc<dyn LookupStore>, config: &ResolverConfig) -> Self {
        Self::with_collaborators(
            store,
            Arc::new(WordTokenizer::new()),
            Arc::new(TitleCaseNormalizer::new()),
            config,
        )
    }

    pub fn with_collaborators(
        store: Arc<dyn LookupStore>,
        tokenizer: Arc<dyn Tokenizer>,
        case_normalizer: Arc<dyn CaseNormalizer>,
        config: &ResolverConfig,
    ) -> Self {
        let capacity = config.cache_limit();

        debug!(
            context_words = config.context_words,
            max_candidates = config.max_candidates,
            cache_capacity = config.cache_capacity,
            "Creating mention resolver"
        );

        Self {
            extractor: ContextWindowExtractor::new(tokenizer, config.context_words),
            normalizer: MentionNormalizer::new(Arc::clone(&store), case_normalizer),
            retriever: CandidateRetriever::new(store, config.max_candidates),
            mention_cache: MemoCache::new("mentions", capacity),
            candidate_cache: MemoCache::new("candidates", capacity),
        }
    }

    /// Left/right word windows around `span`
    pub fn get_context<S: AsRef<str>>(
        &self,
        span: MentionSpan,
        sentence_index: usize,
        sentence: &str,
        sentences: &[S],
    ) -> Result<Context> {
        self.extractor
            .get_context(span, sentence_index, sentence, sentences)
    }

    /// Lookup key for a raw mention (memoized)
    pub fn preprocess_mention(&mut self, mention: &str) -> Result<String> {
        Ok(self.normalize_mention(mention)?.text)
    }

    /// Lookup key for a raw mention plus the rule that chose it (memoized)
    pub fn normalize_mention(&mut self, mention: &str) -> Result<NormalizedMention> {
        if let Some(normalized) = self.mention_cache.get(mention) {
            return Ok(normalized);
        }

        let normalized = self.normalizer.resolve(mention)?;
        self.mention_cache.insert(mention, normalized.clone());
        Ok(normalized)
    }

    /// Bounded candidate list for a mention (memoized)
    pub fn get_candidates(&mut self, mention: &str) -> Result<Vec<Candidate>> {
        if let Some(candidates) = self.candidate_cache.get(mention) {
            return Ok(candidates);
        }

        let candidates = self.retriever.retrieve(mention)?;
        self.candidate_cache.insert(mention, candidates.clone());
        Ok(candidates)
    }

    /// Run context extraction, normalization and candidate retrieval for the
    /// mention at `span` in `sentences[sentence_index]`
    pub fn resolve<S: AsRef<str>>(
        &mut self,
        span: MentionSpan,
        sentence_index: usize,
        sentences: &[S],
    ) -> Result<ResolvedMention> {
        let sentence = sentences
            .get(sentence_index)
            .map(AsRef::as_ref)
            .ok_or(AppError::SentenceOutOfRange {
                index: sentence_index,
                len: sentences.len(),
            })?;

        let text = span.text(sentence)?.to_string();
        let context = self.get_context(span, sentence_index, sentence, sentences)?;
        let normalized = self.normalize_mention(&text)?;
        let candidates = self.get_candidates(&normalized.text)?;

        Ok(ResolvedMention {
            text,
            sentence_index,
            span,
            normalized: normalized.text,
            resolution: normalized.resolution,
            context,
            candidates,
        })
    }

    /// Resolve every mention of a document, in input order
    #[instrument(skip_all, fields(document = document.id.as_deref().unwrap_or("-")))]
    pub fn resolve_document(&mut self, document: &DocumentInput) -> Result<Vec<ResolvedMention>> {
        let resolved = document
            .mentions
            .iter()
            .map(|m| self.resolve(m.span(), m.sentence_index, &document.sentences))
            .collect::<Result<Vec<_>>>()?;

        info!(
            mentions = resolved.len(),
            with_candidates = resolved.iter().filter(|m| !m.candidates.is_empty()).count(),
            "Document resolved"
        );

        Ok(resolved)
    }

    /// Forget every memoized result
    pub fn clear_caches(&mut self) {
        self.mention_cache.clear();
        self.candidate_cache.clear();
        debug!("Resolver caches cleared");
    }

    pub fn cache_stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            mentions: self.mention_cache.stats(),
            candidates: self.candidate_cache.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentionlink_common::store::MemoryLookupStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Memory store that counts every access
    struct CountingStore {
        inner: MemoryLookupStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryLookupStore) -> Arc<Self> {
            Arc::new(Self {
                inner,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LookupStore for CountingStore {
        fn frequency_of(&self, key: &str) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.frequency_of(key)
        }

        fn lowercase_canonical_of(&self, key: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.lowercase_canonical_of(key)
        }

        fn candidates_for(&self, key: &str) -> Result<Vec<Candidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.candidates_for(key)
        }
    }

    /// Store whose backing database is gone
    struct FailingStore {
        calls: AtomicUsize,
    }

    impl LookupStore for FailingStore {
        fn frequency_of(&self, _key: &str) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::StoreConnection {
                message: "database is locked".into(),
            })
        }

        fn lowercase_canonical_of(&self, key: &str) -> Result<Option<String>> {
            self.frequency_of(key).map(|_| None)
        }

        fn candidates_for(&self, key: &str) -> Result<Vec<Candidate>> {
            self.frequency_of(key).map(|_| Vec::new())
        }
    }

    fn wiki() -> MemoryLookupStore {
        MemoryLookupStore::new()
            .with_frequency("Paris", 1200)
            .with_frequency("IBM", 50)
            .with_frequency("Ibm", 10)
            .with_frequency("Apple", 80)
            .with_candidates(
                "Paris",
                vec![
                    Candidate::new("Paris", 0.91),
                    Candidate::new("Paris,_Texas", 0.04),
                ],
            )
            .with_candidates("IBM", vec![Candidate::new("IBM", 0.99)])
            .with_candidates("Apple", vec![Candidate::new("Apple_Inc.", 0.7)])
    }

    fn resolver(store: Arc<dyn LookupStore>) -> MentionContextResolver {
        MentionContextResolver::new(store, &ResolverConfig::default())
    }

    #[test]
    fn test_candidates_memoized() {
        let store = CountingStore::new(wiki());
        let mut r = resolver(store.clone());

        let first = r.get_candidates("Paris").unwrap();
        let calls = store.calls();
        let second = r.get_candidates("Paris").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(store.calls(), calls);
        assert_eq!(r.cache_stats().candidates.hits, 1);
    }

    #[test]
    fn test_empty_candidates_memoized() {
        let store = CountingStore::new(wiki());
        let mut r = resolver(store.clone());

        assert!(r.get_candidates("Atlantis").unwrap().is_empty());
        assert!(r.get_candidates("Atlantis").unwrap().is_empty());
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn test_preprocess_memoized() {
        let store = CountingStore::new(wiki());
        let mut r = resolver(store.clone());

        assert_eq!(r.preprocess_mention("IBM").unwrap(), "IBM");
        let calls = store.calls();
        assert_eq!(r.preprocess_mention("IBM").unwrap(), "IBM");
        assert_eq!(store.calls(), calls);
        assert_eq!(r.cache_stats().mentions.hits, 1);
    }

    #[test]
    fn test_clear_caches_forces_lookup() {
        let store = CountingStore::new(wiki());
        let mut r = resolver(store.clone());

        r.get_candidates("Paris").unwrap();
        r.clear_caches();
        assert_eq!(r.cache_stats().candidates.entries, 0);

        r.get_candidates("Paris").unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[test]
    fn test_disabled_cache_always_queries() {
        let store = CountingStore::new(wiki());
        let config = ResolverConfig {
            cache_capacity: 0,
            ..ResolverConfig::default()
        };
        let mut r = MentionContextResolver::new(store.clone(), &config);

        r.get_candidates("Paris").unwrap();
        r.get_candidates("Paris").unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[test]
    fn test_candidate_limit_from_config() {
        let config = ResolverConfig {
            max_candidates: 1,
            ..ResolverConfig::default()
        };
        let mut r = MentionContextResolver::new(Arc::new(wiki()), &config);
        assert_eq!(
            r.get_candidates("Paris").unwrap(),
            vec![Candidate::new("Paris", 0.91)]
        );
    }

    #[test]
    fn test_store_failures_propagate_and_are_not_cached() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let mut r = resolver(store.clone());

        let err = r.get_candidates("Paris").unwrap_err();
        assert!(err.is_fatal());
        assert!(r.preprocess_mention("Paris").is_err());
        assert!(r.get_candidates("Paris").is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
        assert_eq!(r.cache_stats().candidates.entries, 0);
    }

    #[test]
    fn test_resolve_uses_normalized_key() {
        let mut r = resolver(Arc::new(wiki()));
        let doc = ["Shares of (Apple) rose.", "Analysts were surprised."];

        let resolved = r.resolve(MentionSpan::new(10, 17), 0, &doc).unwrap();

        assert_eq!(resolved.text, "(Apple)");
        assert_eq!(resolved.normalized, "Apple");
        assert_eq!(resolved.resolution, Resolution::Cleaned);
        assert_eq!(resolved.context.left, "Shares of");
        assert_eq!(resolved.context.right, "rose . Analysts were surprised .");
        assert_eq!(resolved.candidates, vec![Candidate::new("Apple_Inc.", 0.7)]);
    }

    #[test]
    fn test_resolve_document() {
        let mut r = resolver(Arc::new(wiki()));
        let doc = DocumentInput::from_json(
            r#"{
                "sentences": ["IBM opened an office in Paris.", "Paris welcomed IBM."],
                "mentions": [
                    {"sentence_index": 0, "start": 0, "end": 3},
                    {"sentence_index": 0, "start": 24, "end": 29},
                    {"sentence_index": 1, "start": 0, "end": 5}
                ]
            }"#,
        )
        .unwrap();

        let resolved = r.resolve_document(&doc).unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].normalized, "IBM");
        assert_eq!(resolved[0].resolution, Resolution::Mention);
        assert_eq!(resolved[1].text, "Paris");
        assert_eq!(resolved[1].context.right, ". Paris welcomed IBM .");
        assert_eq!(resolved[2].context.left, "IBM opened an office in Paris .");
        assert_eq!(resolved[1].candidates, resolved[2].candidates);
        assert_eq!(r.cache_stats().candidates.hits, 1);
    }

    #[test]
    fn test_resolve_rejects_bad_index() {
        let mut r = resolver(Arc::new(wiki()));
        let doc = ["Paris."];
        let err = r.resolve(MentionSpan::new(0, 5), 1, &doc).unwrap_err();
        assert!(matches!(err, AppError::SentenceOutOfRange { index: 1, len: 1 }));
    }
}
