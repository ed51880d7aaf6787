#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kestrel-fin/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod filings;
pub mod manager;
pub mod store;

pub use client::EdgarClient;
pub use error::{DataError, Result};
pub use filings::{CompanyFilings, FilingHistory, FilingInfo, RecentFilings};
pub use manager::{UpdateManager, UpdateOutcome};
pub use store::{FilingRecord, FilingStore, QualityGrade, StoreStats};

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
