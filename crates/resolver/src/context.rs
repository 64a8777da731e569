//! Context window extraction
//!
//! Collects up to `window` words on each side of a mention, spilling into
//! neighbouring sentences when the mention's own sentence runs out.

use mentionlink_common::errors::{AppError, Result};
use mentionlink_common::metrics;
use mentionlink_common::text::Tokenizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Character offsets of a mention inside its sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    pub start: usize,
    pub end: usize,
}

impl MentionSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert the span to byte offsets in `sentence`, rejecting spans that
    /// are reversed or run past the end.
    pub fn byte_range(&self, sentence: &str) -> Result<(usize, usize)> {
        let invalid = || AppError::InvalidSpan {
            start: self.start,
            end: self.end,
            len: sentence.chars().count(),
        };

        if self.start > self.end {
            return Err(invalid());
        }

        let start = char_to_byte(sentence, self.start).ok_or_else(invalid)?;
        let end = char_to_byte(sentence, self.end).ok_or_else(invalid)?;
        Ok((start, end))
    }

    /// The mention text covered by this span
    pub fn text<'a>(&self, sentence: &'a str) -> Result<&'a str> {
        let (start, end) = self.byte_range(sentence)?;
        Ok(&sentence[start..end])
    }
}

/// Byte offset of the `pos`-th character; `pos == char count` maps to the end
fn char_to_byte(text: &str, pos: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(pos)
}

/// Words surrounding a mention
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub left: String,
    pub right: String,
}

/// Builds left/right word windows around mentions
#[derive(Clone)]
pub struct ContextWindowExtractor {
    tokenizer: Arc<dyn Tokenizer>,
    window: usize,
}

impl ContextWindowExtractor {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, window: usize) -> Self {
        Self { tokenizer, window }
    }

    /// Maximum words per side
    pub fn window(&self) -> usize {
        self.window
    }

    /// Extract the context of `span` in `sentence`, which sits at
    /// `sentence_index` within `sentences`.
    pub fn get_context<S: AsRef<str>>(
        &self,
        span: MentionSpan,
        sentence_index: usize,
        sentence: &str,
        sentences: &[S],
    ) -> Result<Context> {
        if sentence_index >= sentences.len() {
            return Err(AppError::SentenceOutOfRange {
                index: sentence_index,
                len: sentences.len(),
            });
        }
        let (start, end) = span.byte_range(sentence)?;

        let left = self.left_words(&sentence[..start], sentence_index, sentences);
        let right = self.right_words(&sentence[end..], sentence_index, sentences);

        metrics::record_context(left.len(), right.len());

        Ok(Context {
            left: left.join(" "),
            right: right.join(" "),
        })
    }

    fn left_words<S: AsRef<str>>(
        &self,
        prefix: &str,
        sentence_index: usize,
        sentences: &[S],
    ) -> Vec<String> {
        // Collected nearest-first, reversed once at the end
        let mut chunks = vec![self.tokenizer.split_words(prefix)];
        let mut count = chunks[0].len();

        let mut i = sentence_index;
        while i > 0 && count <= self.window {
            i -= 1;
            let words = self.tokenizer.split_words(sentences[i].as_ref());
            count += words.len();
            chunks.push(words);
        }

        let words: Vec<String> = chunks.into_iter().rev().flatten().collect();
        let skip = words.len().saturating_sub(self.window);
        words.into_iter().skip(skip).collect()
    }

    fn right_words<S: AsRef<str>>(
        &self,
        suffix: &str,
        sentence_index: usize,
        sentences: &[S],
    ) -> Vec<String> {
        let mut words = self.tokenizer.split_words(suffix);

        if sentence_index < sentences.len() {
            let mut i = sentence_index + 1;
            while i < sentences.len() && words.len() <= self.window {
                words.extend(self.tokenizer.split_words(sentences[i].as_ref()));
                i += 1;
            }
        }

        words.truncate(self.window);
        words
    }
}
