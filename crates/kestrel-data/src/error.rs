//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP-level failure from an SEC endpoint
    #[error("EDGAR API error: {0}")]
    EdgarApi(String),

    /// CIK not found for ticker
    #[error("CIK not found for ticker: {0}")]
    CikNotFound(String),

    /// Invalid ticker or CIK input
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data parsing error
    #[error("data parsing error: {0}")]
    Parse(String),

    /// Missing data for a ticker
    #[error("missing data for {ticker}: {reason}")]
    MissingData {
        /// Ticker that was queried
        ticker: String,
        /// Reason for the missing data
        reason: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// KPI extraction failure surfaced through the update manager
    #[error(transparent)]
    Extract(#[from] kestrel_extract::ExtractError),

    /// Companyfacts parsing failure
    #[error(transparent)]
    Facts(#[from] kestrel_facts::FactsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
