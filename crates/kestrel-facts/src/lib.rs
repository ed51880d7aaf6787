#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kestrel-fin/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod select;
pub mod snapshot;

pub use error::{FactsError, Result};
pub use model::{CompanyFacts, FactItem, TagFacts, tags};
pub use select::{FramePreference, select_latest};
pub use snapshot::{FactProvenance, FinancialSnapshot, SnapshotProvenance, parse_snapshot};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
