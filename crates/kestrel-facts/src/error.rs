//! Error types for facts parsing.

use thiserror::Error;

/// Result type for facts operations.
pub type Result<T> = std::result::Result<T, FactsError>;

/// Errors that can occur while handling companyfacts documents.
#[derive(Debug, Error)]
pub enum FactsError {
    /// The companyfacts JSON could not be deserialized
    #[error("failed to parse companyfacts document: {0}")]
    Parse(#[from] serde_json::Error),
}
