//! Search error types

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur while building or querying a searcher
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Sentence index outside the corpus
    #[error("sentence index {index} out of range for corpus of {len} sentences")]
    IndexOutOfRange { index: usize, len: usize },

    /// Argument rejected before any state was touched
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation of a gram table or scratch buffer failed
    #[error("resource exhausted: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Config(err.to_string())
    }
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
