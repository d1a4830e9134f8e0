//! Error types for the similarity engine

use thiserror::Error;
use wordtreasure_domain::traits::ProviderError;

/// Errors that can occur while processing one request
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad input; rejected before any provider call
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Embedding or entailment provider failure
    #[error("Provider unavailable: {0}")]
    Provider(#[from] ProviderError),

    /// A programming defect, not a user-facing condition
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

/// Input validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty or whitespace-only word
    #[error("{field} must not be empty")]
    Empty {
        /// Which request field was empty
        field: &'static str,
    },

    /// Word exceeds the configured length bound
    #[error("{field} too long: {len} chars (max: {max})")]
    TooLong {
        /// Which request field was too long
        field: &'static str,
        /// Actual character count
        len: usize,
        /// Configured maximum
        max: usize,
    },
}
