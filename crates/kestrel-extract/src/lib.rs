#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kestrel-fin/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cite;
pub mod document;
pub mod error;
pub mod extractor;
pub mod mappings;
pub mod numeric;
pub mod scale;

pub use cite::Citation;
pub use document::read_document;
pub use error::{ExtractError, Result};
pub use extractor::{ExtractedKpi, KpiExtractor, extract_from_filings};
pub use mappings::{KpiMapping, KpiMappings, TickerMappings};
pub use numeric::largest_numeric_token;
pub use scale::scale_to_millions;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
