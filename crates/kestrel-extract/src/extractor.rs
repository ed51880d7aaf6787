//! Pattern-based KPI extraction engine.
//!
//! For each configured KPI the extractor walks the ticker's pattern list
//! in declaration order, pulls a numeric value out of the first match
//! (capture group first, numeric scan as fallback), normalizes its scale
//! to millions and attaches a citation. When a preferred substring is
//! configured, a match containing it is accepted immediately; the first
//! match without it is held as a fallback while later patterns are tried.

use crate::cite::Citation;
use crate::document::read_document;
use crate::error::{ExtractError, Result};
use crate::mappings::{KpiMapping, KpiMappings};
use crate::numeric::largest_numeric_token;
use crate::scale::scale_to_millions;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, warn};

/// A single extracted KPI value with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKpi {
    /// Extracted numeric value, normalized to millions
    pub value: f64,

    /// Unit label from the mapping configuration (e.g. "CAD millions")
    pub unit: String,

    /// Citation pointing at the matched text
    pub citation: Citation,
}

/// Progress of the pattern walk for one KPI.
///
/// `FallbackHeld` keeps the first match that lacked the preferred
/// substring while later patterns are still searched for a preferred one;
/// `Accepted` ends the walk.
#[derive(Debug)]
enum PatternSearch {
    Searching,
    FallbackHeld(ExtractedKpi),
    Accepted(ExtractedKpi),
}

impl PatternSearch {
    fn finish(self) -> Option<ExtractedKpi> {
        match self {
            Self::Searching => None,
            Self::FallbackHeld(kpi) | Self::Accepted(kpi) => Some(kpi),
        }
    }
}

/// KPI extraction engine over a mapping configuration.
///
/// The extractor is a pure function of its inputs: the same document,
/// ticker and configuration always produce identical output. It holds no
/// mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct KpiExtractor {
    mappings: KpiMappings,
}

impl KpiExtractor {
    /// Create an extractor over an already-loaded mapping configuration.
    pub fn new(mappings: KpiMappings) -> Self {
        Self { mappings }
    }

    /// Create an extractor from a JSON mapping file.
    pub fn from_mapping_file(path: &Path) -> Result<Self> {
        Ok(Self::new(KpiMappings::from_file(path)?))
    }

    /// The mapping configuration this extractor runs with.
    pub fn mappings(&self) -> &KpiMappings {
        &self.mappings
    }

    /// Extract every configured KPI for `ticker` from `text`.
    ///
    /// Returns one entry per KPI for which some pattern matched; a KPI
    /// absent from the result simply had no match, which is not an error.
    ///
    /// # Errors
    /// [`ExtractError::ConfigurationMissing`] when the ticker has no
    /// mapping entry at all. Individual pattern failures (bad regex,
    /// unparseable capture) are logged and treated as non-matches.
    pub fn extract(
        &self,
        text: &str,
        doc_id: &str,
        ticker: &str,
    ) -> Result<BTreeMap<String, ExtractedKpi>> {
        let ticker_mappings = self
            .mappings
            .ticker(ticker)
            .ok_or_else(|| ExtractError::ConfigurationMissing(ticker.to_string()))?;

        let mut extracted = BTreeMap::new();
        for (kpi_name, mapping) in ticker_mappings {
            if let Some(kpi) = extract_kpi(text, doc_id, mapping) {
                debug!(ticker, kpi = %kpi_name, value = kpi.value, "extracted KPI");
                extracted.insert(kpi_name.clone(), kpi);
            }
        }
        Ok(extracted)
    }

    /// Read a document from disk and extract every configured KPI.
    ///
    /// The document id recorded on citations is the file name.
    ///
    /// # Errors
    /// [`ExtractError::UnsupportedFormat`] for unknown extensions,
    /// [`ExtractError::Io`] on read failure, plus everything
    /// [`Self::extract`] can return.
    pub fn extract_from_file(
        &self,
        path: &Path,
        ticker: &str,
    ) -> Result<BTreeMap<String, ExtractedKpi>> {
        let content = read_document(path)?;
        let doc_id = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        self.extract(&content, doc_id, ticker)
    }
}

/// Walk one KPI's pattern list and pick a value per the preference rule.
fn extract_kpi(text: &str, doc_id: &str, mapping: &KpiMapping) -> Option<ExtractedKpi> {
    let mut search = PatternSearch::Searching;

    for pattern in &mapping.patterns {
        let Some((candidate, matched)) = try_pattern(text, doc_id, pattern, &mapping.unit) else {
            continue;
        };

        let preferred = mapping
            .prefer
            .as_deref()
            .map(|p| text[matched].contains(p));

        search = match preferred {
            // No preference configured, or the match carries the
            // preferred substring: accept and stop.
            None | Some(true) => PatternSearch::Accepted(candidate),
            // Hold the first non-preferred match, keep searching.
            Some(false) => match search {
                PatternSearch::Searching => PatternSearch::FallbackHeld(candidate),
                held => held,
            },
        };

        if matches!(search, PatternSearch::Accepted(_)) {
            break;
        }
    }

    search.finish()
}

/// Run one pattern against the document and build a candidate value.
///
/// Compile failures are logged and treated as a non-match so a single bad
/// pattern never aborts the extraction.
fn try_pattern(
    text: &str,
    doc_id: &str,
    pattern: &str,
    unit: &str,
) -> Option<(ExtractedKpi, Range<usize>)> {
    let regex = match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
    {
        Ok(regex) => regex,
        Err(error) => {
            warn!(pattern, %error, "KPI pattern failed to compile, skipping");
            return None;
        }
    };

    let caps = regex.captures(text)?;
    let whole = caps.get(0)?;
    let matched = whole.as_str();

    // Prefer an explicit capture group; fall back to scanning the whole
    // match when the group is absent or does not parse.
    let value = match caps.get(1) {
        Some(group) => {
            parse_captured_value(group.as_str()).or_else(|| largest_numeric_token(matched))
        }
        None => largest_numeric_token(matched),
    }?;

    let value = value * scale_to_millions(matched);
    let citation = Citation::from_match(doc_id, 1, text, whole.start(), whole.end());

    Some((
        ExtractedKpi {
            value,
            unit: unit.to_string(),
            citation,
        },
        whole.range(),
    ))
}

/// Parse a captured numeric group after removing currency symbols and
/// thousands separators.
fn parse_captured_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Extract KPIs from every filing for a ticker in a directory.
///
/// Files named `{ticker}_*.txt` (ticker lowercased) are processed in
/// lexicographic order and merged with last-write-wins semantics, so
/// later filings override earlier ones for the same KPI name. Per-file
/// failures are logged and skipped; they never abort the batch.
///
/// # Errors
/// Fails only if the directory itself cannot be read.
pub fn extract_from_filings(
    extractor: &KpiExtractor,
    filings_dir: &Path,
    ticker: &str,
) -> Result<BTreeMap<String, ExtractedKpi>> {
    let prefix = format!("{}_", ticker.to_lowercase());

    let mut paths: Vec<_> = std::fs::read_dir(filings_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("txt")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    paths.sort();

    let mut merged = BTreeMap::new();
    for path in paths {
        match extractor.extract_from_file(&path, ticker) {
            Ok(kpis) => merged.extend(kpis),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping filing");
            }
        }
    }

    Ok(merged)
}
