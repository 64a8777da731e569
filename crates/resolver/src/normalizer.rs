//! Mention normalization
//!
//! Picks the surface form of a mention most likely to have candidates in the
//! lookup store: the mention itself, its alternate casing, a lowercase
//! mapping, or a punctuation-stripped form.

use mentionlink_common::errors::Result;
use mentionlink_common::metrics;
use mentionlink_common::store::LookupStore;
use mentionlink_common::text::CaseNormalizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Characters removed when building the cleaned form of a mention
pub const STRIPPED_CHARS: &[char] = &['(', ')', ',', '!', '\''];

/// Which rule produced a normalized mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The mention as written is the more frequent form
    Mention,
    /// The alternate casing is the more frequent (or only known) form
    Variant,
    /// Canonical casing registered for the lowercased mention
    Lowercase,
    /// Mention with punctuation stripped
    Cleaned,
    /// Nothing matched; the mention is passed through
    Unchanged,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Mention => "mention",
            Resolution::Variant => "variant",
            Resolution::Lowercase => "lowercase",
            Resolution::Cleaned => "cleaned",
            Resolution::Unchanged => "unchanged",
        }
    }
}

/// A mention resolved to its lookup key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMention {
    pub text: String,
    pub resolution: Resolution,
}

impl NormalizedMention {
    fn new(text: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            text: text.into(),
            resolution,
        }
    }
}

/// Remove stripped characters and surrounding whitespace
pub fn clean_mention(mention: &str) -> String {
    mention
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolves raw mentions against store frequencies
#[derive(Clone)]
pub struct MentionNormalizer {
    store: Arc<dyn LookupStore>,
    case_normalizer: Arc<dyn CaseNormalizer>,
}

impl MentionNormalizer {
    pub fn new(store: Arc<dyn LookupStore>, case_normalizer: Arc<dyn CaseNormalizer>) -> Self {
        Self {
            store,
            case_normalizer,
        }
    }

    /// Normalize a mention, returning only the resolved text
    pub fn normalize(&self, mention: &str) -> Result<String> {
        Ok(self.resolve(mention)?.text)
    }

    /// Normalize a mention and report which rule decided it
    pub fn resolve(&self, mention: &str) -> Result<NormalizedMention> {
        let variant = self.case_normalizer.modify_uppercase_phrase(mention);

        let freq_mention = self.frequency(mention)?;
        let freq_variant = if variant == mention {
            freq_mention
        } else {
            self.frequency(&variant)?
        };

        let normalized = match (freq_mention, freq_variant) {
            (Some(m), Some(v)) if m > v => NormalizedMention::new(mention, Resolution::Mention),
            (Some(_), Some(_)) => NormalizedMention::new(variant, Resolution::Variant),
            (Some(_), None) => NormalizedMention::new(mention, Resolution::Mention),
            (None, Some(_)) => NormalizedMention::new(variant, Resolution::Variant),
            (None, None) => self.fallback(mention)?,
        };

        debug!(
            mention,
            normalized = %normalized.text,
            resolution = normalized.resolution.as_str(),
            ?freq_mention,
            ?freq_variant,
            "Mention normalized"
        );
        metrics::record_normalization(normalized.resolution.as_str());

        Ok(normalized)
    }

    /// Lowercase mapping first, then the punctuation-stripped form
    fn fallback(&self, mention: &str) -> Result<NormalizedMention> {
        let timer = metrics::LookupTimer::start("lower");
        let lower = self
            .store
            .lowercase_canonical_of(&mention.to_lowercase())?
            .filter(|s| !s.is_empty());
        timer.finish(lower.is_some());

        if let Some(canonical) = lower {
            return Ok(NormalizedMention::new(canonical, Resolution::Lowercase));
        }

        let cleaned = clean_mention(mention);
        if !cleaned.is_empty() && self.frequency(&cleaned)?.is_some() {
            return Ok(NormalizedMention::new(cleaned, Resolution::Cleaned));
        }

        Ok(NormalizedMention::new(mention, Resolution::Unchanged))
    }

    /// Frequency lookup where a zero count counts as absent
    fn frequency(&self, key: &str) -> Result<Option<u64>> {
        let timer = metrics::LookupTimer::start("freq");
        let freq = self.store.frequency_of(key)?.filter(|&f| f > 0);
        timer.finish(freq.is_some());
        Ok(freq)
    }
}
