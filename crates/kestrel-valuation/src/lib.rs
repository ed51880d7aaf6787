#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kestrel-fin/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod inputs;
pub mod scenario;

pub use config::{
    CapitalStructure, ConsistencyReport, FinancialData, MarketAssumptions, ValuationConfig,
};
pub use engine::{DcfComponents, DcfOutcome, ValuationResults, dcf, epv, valuation, wacc};
pub use inputs::ValuationInputs;
pub use scenario::ValuationScenario;

/// Errors that can occur loading valuation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be deserialized
    #[error("failed to parse valuation configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for valuation configuration loading.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
