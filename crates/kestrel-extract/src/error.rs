//! Error types for KPI extraction.

use thiserror::Error;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during KPI extraction.
///
/// Pattern-level failures (a regex that does not compile, a capture that
/// does not parse) are deliberately absent: they are recovered inside the
/// extractor and surface only as log lines and missing KPIs.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No mapping configuration exists for the requested ticker
    #[error("no KPI mappings found for ticker: {0}")]
    ConfigurationMissing(String),

    /// The document file has an extension the reader does not handle
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// A mapping configuration failed structural validation
    #[error("invalid KPI mapping for {ticker}/{kpi}: {reason}")]
    InvalidMapping {
        /// Ticker the mapping belongs to
        ticker: String,
        /// KPI name within the ticker's mappings
        kpi: String,
        /// Why validation rejected it
        reason: String,
    },

    /// Mapping configuration could not be deserialized
    #[error("failed to parse mapping configuration: {0}")]
    MappingParse(#[from] serde_json::Error),

    /// IO error reading a document or configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
