#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kestrel-fin/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the sub-crates under stable module names.
pub use kestrel_data as data;
pub use kestrel_extract as extract;
pub use kestrel_facts as facts;
pub use kestrel_valuation as valuation;

// Re-export the workhorse types at the crate root.
pub use kestrel_data::{EdgarClient, FilingStore, UpdateManager};
pub use kestrel_extract::{ExtractedKpi, KpiExtractor, KpiMappings};
pub use kestrel_facts::{CompanyFacts, FinancialSnapshot, FramePreference, parse_snapshot};
pub use kestrel_valuation::{ValuationInputs, ValuationResults, valuation};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
