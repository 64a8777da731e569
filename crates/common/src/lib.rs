//! MentionLink Common Library
//!
//! Shared code for the MentionLink crates including:
//! - Lookup store trait and backends (memory, SeaORM)
//! - Text collaborators (tokenizer, case normalizer)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod store;
pub mod text;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use store::{Candidate, LookupStore};
pub use text::{CaseNormalizer, Tokenizer};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of words kept on each side of a mention
pub const DEFAULT_CONTEXT_WORDS: usize = 100;

/// Default number of candidates returned per mention
pub const DEFAULT_MAX_CANDIDATES: usize = 100;
