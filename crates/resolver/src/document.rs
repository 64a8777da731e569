//! Document input accepted by the resolver CLI

use crate::context::MentionSpan;
use mentionlink_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document split into sentences, with the mentions to resolve
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DocumentInput {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1))]
    pub sentences: Vec<String>,

    #[serde(default)]
    pub mentions: Vec<MentionInput>,
}

/// A mention located by sentence and character offsets
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MentionInput {
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
}

impl MentionInput {
    pub fn span(&self) -> MentionSpan {
        MentionSpan::new(self.start, self.end)
    }
}

impl DocumentInput {
    /// Parse and validate a document from JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(raw)?;
        document.check()?;
        Ok(document)
    }

    /// Validate structure and every mention's location
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: Some("sentences".to_string()),
        })?;

        for mention in &self.mentions {
            let sentence = self.sentences.get(mention.sentence_index).ok_or(
                AppError::SentenceOutOfRange {
                    index: mention.sentence_index,
                    len: self.sentences.len(),
                },
            )?;
            mention.span().byte_range(sentence)?;
        }

        Ok(())
    }
}
