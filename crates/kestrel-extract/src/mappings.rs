//! Typed KPI mapping configuration.
//!
//! Mappings are keyed by ticker, then KPI name. Each entry carries an
//! ordered list of regex patterns (tried in declaration order), the unit
//! label to stamp on extracted values, an optional preferred substring
//! used as a tie-break between pattern matches, and an optional
//! normalization hint.
//!
//! ```json
//! {
//!   "PPL": {
//!     "EBITDA": {
//!       "patterns": ["Adjusted EBITDA[^\\d]*\\$?([0-9,]+)\\s*million"],
//!       "unit": "CAD millions",
//!       "prefer": "Adjusted",
//!       "normalize": "strip_commas"
//!     }
//!   }
//! }
//! ```

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Extraction configuration for a single KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiMapping {
    /// Regex patterns, tried in declaration order; the first satisfying
    /// pattern wins subject to the preference rule
    pub patterns: Vec<String>,

    /// Unit label stamped on extracted values (e.g. "CAD millions")
    #[serde(default)]
    pub unit: String,

    /// Preferred substring: a match containing it is accepted over an
    /// earlier match that does not
    #[serde(default)]
    pub prefer: Option<String>,

    /// Normalization hint. Only "strip_commas" is defined and it is the
    /// always-on behavior; the field is kept so configurations can state
    /// intent explicitly.
    #[serde(default)]
    pub normalize: Option<String>,
}

/// All KPI mappings for one ticker, keyed by KPI name.
pub type TickerMappings = BTreeMap<String, KpiMapping>;

/// The full mapping configuration, keyed by ticker.
///
/// Ordered maps keep iteration (and therefore logging and CLI output)
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiMappings {
    tickers: BTreeMap<String, TickerMappings>,
}

impl KpiMappings {
    /// Build a mapping configuration from already-typed entries.
    pub fn new(tickers: BTreeMap<String, TickerMappings>) -> Self {
        Self { tickers }
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mappings: Self = serde_json::from_str(json)?;
        mappings.validate()?;
        Ok(mappings)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Structural validation: every KPI must declare at least one pattern.
    ///
    /// Pattern compilability is deliberately not checked here; a pattern
    /// that fails to compile is treated as a non-match at extraction time
    /// so one bad entry cannot take down the rest of the configuration.
    pub fn validate(&self) -> Result<()> {
        for (ticker, kpis) in &self.tickers {
            for (kpi, mapping) in kpis {
                if mapping.patterns.is_empty() {
                    return Err(ExtractError::InvalidMapping {
                        ticker: ticker.clone(),
                        kpi: kpi.clone(),
                        reason: "empty pattern list".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Mappings for one ticker, if configured.
    pub fn ticker(&self, ticker: &str) -> Option<&TickerMappings> {
        self.tickers.get(ticker)
    }

    /// All configured tickers, in sorted order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.tickers.keys().map(String::as_str)
    }

    /// Whether any ticker is configured.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
