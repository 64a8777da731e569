//! Error types for MentionLink
//!
//! Provides a single error enum for every crate in the workspace with:
//! - Distinct variants for caller contract violations and store failures
//! - Machine-readable error codes
//! - Fatal/non-fatal classification for callers deciding whether to abort a run

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors (1xxx)
    ValidationError,
    InvalidSpan,
    SentenceOutOfRange,

    // Store errors (7xxx)
    StoreError,
    StoreConnectionError,
    CorruptRecord,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Input (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidSpan => 1002,
            ErrorCode::SentenceOutOfRange => 1003,

            // Store (7xxx)
            ErrorCode::StoreError => 7001,
            ErrorCode::StoreConnectionError => 7002,
            ErrorCode::CorruptRecord => 7003,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid mention span {start}..{end} for sentence of {len} characters")]
    InvalidSpan { start: usize, end: usize, len: usize },

    #[error("Sentence index {index} out of range for document of {len} sentences")]
    SentenceOutOfRange { index: usize, len: usize },

    // Store errors
    #[error("Store error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Store connection error: {message}")]
    StoreConnection { message: String },

    #[error("Corrupt store record for key '{key}': {message}")]
    CorruptRecord { key: String, message: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidSpan { .. } => ErrorCode::InvalidSpan,
            AppError::SentenceOutOfRange { .. } => ErrorCode::SentenceOutOfRange,
            AppError::Database(_) => ErrorCode::StoreError,
            AppError::StoreConnection { .. } => ErrorCode::StoreConnectionError,
            AppError::CorruptRecord { .. } => ErrorCode::CorruptRecord,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Store and setup failures abort the run; input errors only affect one mention
    pub fn is_fatal(&self) -> bool {
        !self.is_input_error()
    }

    /// Check if this error was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation { .. }
                | AppError::InvalidSpan { .. }
                | AppError::SentenceOutOfRange { .. }
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}
