//! Text collaborators used by the resolver
//!
//! Provides the two string utilities mention preprocessing depends on:
//! - Word tokenization for context windows
//! - Alternate casing for all-uppercase mentions

/// Trait for word segmentation
pub trait Tokenizer: Send + Sync {
    /// Split text into an ordered sequence of word tokens
    fn split_words(&self, text: &str) -> Vec<String>;
}

/// Trait for producing an alternate casing of a mention
pub trait CaseNormalizer: Send + Sync {
    /// Return the alternate-case rendering used as a secondary lookup key
    fn modify_uppercase_phrase(&self, text: &str) -> String;
}

/// Splits on whitespace, keeping word-character runs together and emitting
/// every other symbol as its own token.
///
/// "AT&T's stock" becomes `["AT", "&", "T", "'", "s", "stock"]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

impl Tokenizer for WordTokenizer {
    fn split_words(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            if Self::is_word_char(c) {
                current.push(c);
                continue;
            }

            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                words.push(c.to_string());
            }
        }

        if !current.is_empty() {
            words.push(current);
        }

        words
    }
}

/// Title-cases text that is written entirely in uppercase, leaves anything
/// else untouched ("NEW YORK" -> "New York", "iPhone" -> "iPhone").
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleCaseNormalizer;

impl TitleCaseNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Uppercase the first cased letter of every letter run, lowercase the rest
    pub fn title_case(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_word = false;

        for c in text.chars() {
            if c.is_alphabetic() {
                if in_word {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                in_word = true;
            } else {
                out.push(c);
                in_word = false;
            }
        }

        out
    }
}

impl CaseNormalizer for TitleCaseNormalizer {
    fn modify_uppercase_phrase(&self, text: &str) -> String {
        if text == text.to_uppercase() {
            Self::title_case(text)
        } else {
            text.to_string()
        }
    }
}
