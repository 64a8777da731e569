//! MentionLink Resolver
//!
//! Mention preprocessing for entity linking:
//! - Context windows around a mention, spanning sentence boundaries
//! - Mention normalization against lookup-store frequencies
//! - Bounded, memoized candidate retrieval
//!
//! ```no_run
//! use mentionlink_common::config::ResolverConfig;
//! use mentionlink_common::store::MemoryLookupStore;
//! use mentionlink_resolver::{MentionContextResolver, MentionSpan};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryLookupStore::from_snapshot("wiki.json")?);
//! let mut resolver = MentionContextResolver::new(store, &ResolverConfig::default());
//!
//! let sentences = ["Obama visited Paris.", "He met the mayor."];
//! let resolved = resolver.resolve(MentionSpan::new(14, 19), 0, &sentences)?;
//! println!("{} -> {:?}", resolved.normalized, resolved.candidates);
//! # Ok::<(), mentionlink_common::AppError>(())
//! ```

pub mod cache;
pub mod candidates;
pub mod context;
pub mod document;
pub mod normalizer;
pub mod resolver;

pub use candidates::CandidateRetriever;
pub use context::{Context, ContextWindowExtractor, MentionSpan};
pub use document::{DocumentInput, MentionInput};
pub use normalizer::{MentionNormalizer, NormalizedMention, Resolution};
pub use resolver::{MentionContextResolver, ResolvedMention, ResolverCacheStats};
