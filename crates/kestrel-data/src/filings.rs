//! Filing-history model from the SEC submissions API.
//!
//! The submissions endpoint returns filing information as parallel arrays
//! where each index corresponds to a single filing.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::Deserialize;

/// Company filings metadata from `submissions/CIK{cik}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFilings {
    /// CIK as returned by the API
    pub cik: String,
    /// Company name
    pub name: String,
    /// Filing history container
    pub filings: FilingHistory,
}

/// Container for filing history data.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingHistory {
    /// Recent filings
    pub recent: RecentFilings,
}

/// Recent filings as parallel arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    /// Accession numbers (unique filing identifiers)
    pub accession_number: Vec<String>,
    /// Form types ("10-K", "10-Q", "8-K", ...)
    pub form: Vec<String>,
    /// Filing dates in `YYYY-MM-DD`
    pub filing_date: Vec<String>,
    /// Primary document filenames
    pub primary_document: Vec<String>,
}

/// A single filing extracted from the parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingInfo {
    /// Accession number
    pub accession_number: String,
    /// Form type
    pub form: String,
    /// Filing date
    pub filing_date: NaiveDate,
    /// Primary document filename
    pub primary_document: String,
}

impl CompanyFilings {
    /// The most recent 10-Q (quarterly report), if any.
    pub fn latest_10q(&self) -> Option<FilingInfo> {
        self.find_latest_by_form("10-Q")
    }

    /// The most recent 10-K (annual report), if any.
    pub fn latest_10k(&self) -> Option<FilingInfo> {
        self.find_latest_by_form("10-K")
    }

    /// The most recent quarterly report, falling back to the most recent
    /// annual report.
    pub fn latest_periodic(&self) -> Option<FilingInfo> {
        self.latest_10q().or_else(|| self.latest_10k())
    }

    /// Find the most recent filing of a form type. The API returns
    /// filings newest first, so the first index match wins.
    fn find_latest_by_form(&self, form_type: &str) -> Option<FilingInfo> {
        let recent = &self.filings.recent;
        (0..recent.form.len())
            .find(|i| recent.form[*i] == form_type)
            .and_then(|i| self.filing_at_index(i).ok())
    }

    /// Extract filing information at an index of the parallel arrays.
    fn filing_at_index(&self, idx: usize) -> Result<FilingInfo> {
        let recent = &self.filings.recent;

        let filing_date = NaiveDate::parse_from_str(&recent.filing_date[idx], "%Y-%m-%d")
            .map_err(|e| DataError::Parse(format!("invalid filing date: {e}")))?;

        Ok(FilingInfo {
            accession_number: recent.accession_number[idx].clone(),
            form: recent.form[idx].clone(),
            filing_date,
            primary_document: recent.primary_document[idx].clone(),
        })
    }
}

impl FilingInfo {
    /// URL of the primary document on the EDGAR archive.
    pub fn document_url(&self, cik: &str) -> String {
        // Accession numbers drop their dashes in archive paths.
        let accession = self.accession_number.replace('-', "");
        let cik_trimmed = cik.trim_start_matches('0');

        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            cik_trimmed, accession, self.primary_document
        )
    }
}
