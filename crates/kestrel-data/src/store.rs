//! SQLite-backed storage for fetched filings.
//!
//! The store keeps the latest fetched filing per ticker (metadata plus
//! raw document text, so extraction can rerun offline) and the universe
//! of tracked tickers.

use crate::error::{DataError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extraction-quality grade for a stored filing, derived from how many
/// KPIs the extractor found in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    /// More than five KPIs extracted
    Excellent,
    /// Three to five KPIs extracted
    Good,
    /// One or two KPIs extracted
    Fair,
    /// Nothing extracted
    Poor,
}

impl QualityGrade {
    /// Grade a filing by the number of KPIs extracted from it.
    pub const fn from_kpi_count(count: usize) -> Self {
        match count {
            0 => Self::Poor,
            1..=2 => Self::Fair,
            3..=5 => Self::Good,
            _ => Self::Excellent,
        }
    }

    /// Database string representation.
    pub const fn to_db_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Parse from the database string representation.
    pub fn from_db_str(s: &str) -> Result<Self> {
        match s {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(DataError::Parse(format!("invalid quality grade: {s}"))),
        }
    }
}

/// Metadata for a stored filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    /// Ticker the filing belongs to
    pub ticker: String,
    /// Form type ("10-Q", "10-K")
    pub form: String,
    /// Filing date
    pub filing_date: NaiveDate,
    /// Accession number
    pub accession_number: String,
    /// Primary document filename
    pub primary_document: String,
    /// When the filing was last fetched
    pub last_updated: DateTime<Utc>,
    /// Extraction quality grade
    pub quality: QualityGrade,
}

/// Store statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored filings
    pub filings: usize,
    /// Number of active tickers in the universe
    pub universe_size: usize,
}

/// SQLite store of filings and the tracked universe.
#[derive(Debug)]
pub struct FilingStore {
    conn: Connection,
}

impl FilingStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS filings (
                ticker TEXT PRIMARY KEY,
                form TEXT NOT NULL,
                filing_date TEXT NOT NULL,
                accession_number TEXT NOT NULL,
                primary_document TEXT NOT NULL,
                content TEXT NOT NULL,
                last_updated TEXT NOT NULL,
                quality TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS universe (
                ticker TEXT PRIMARY KEY,
                cik TEXT NOT NULL,
                name TEXT,
                active INTEGER NOT NULL DEFAULT 1
            )",
            [],
        )?;

        Ok(())
    }

    /// Store a filing, replacing any previous filing for the ticker.
    pub fn put_filing(&self, record: &FilingRecord, content: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO filings
             (ticker, form, filing_date, accession_number, primary_document,
              content, last_updated, quality)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.ticker,
                record.form,
                record.filing_date.to_string(),
                record.accession_number,
                record.primary_document,
                content,
                record.last_updated.to_rfc3339(),
                record.quality.to_db_str(),
            ],
        )?;
        Ok(())
    }

    /// Metadata for a ticker's stored filing.
    pub fn get_record(&self, ticker: &str) -> Result<Option<FilingRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT ticker, form, filing_date, accession_number,
                        primary_document, last_updated, quality
                 FROM filings WHERE ticker = ?1",
                params![ticker],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        record
            .map(
                |(ticker, form, filing_date, accession_number, primary_document, updated, quality)| {
                    Ok(FilingRecord {
                        ticker,
                        form,
                        filing_date: NaiveDate::parse_from_str(&filing_date, "%Y-%m-%d")
                            .map_err(|e| DataError::Parse(format!("invalid filing date: {e}")))?,
                        accession_number,
                        primary_document,
                        last_updated: DateTime::parse_from_rfc3339(&updated)
                            .map_err(|e| DataError::Parse(format!("invalid timestamp: {e}")))?
                            .with_timezone(&Utc),
                        quality: QualityGrade::from_db_str(&quality)?,
                    })
                },
            )
            .transpose()
    }

    /// Raw document text of a ticker's stored filing.
    pub fn get_content(&self, ticker: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT content FROM filings WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Add a ticker to the tracked universe (reactivates if present).
    pub fn add_to_universe(&self, ticker: &str, cik: &str, name: Option<&str>) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO universe (ticker, cik, name, active)
             VALUES (?1, ?2, ?3, 1)",
            params![ticker, cik, name],
        )?;
        Ok(())
    }

    /// Mark a ticker inactive.
    pub fn remove_from_universe(&self, ticker: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE universe SET active = 0 WHERE ticker = ?1",
            params![ticker],
        )?;
        Ok(())
    }

    /// Active tickers with their CIKs, sorted by ticker.
    pub fn universe(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT ticker, cik FROM universe WHERE active = 1 ORDER BY ticker")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// CIK for a tracked ticker.
    pub fn get_cik(&self, ticker: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT cik FROM universe WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let filings: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM filings", [], |row| row.get(0))?;
        let universe_size: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM universe WHERE active = 1",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            filings: filings as usize,
            universe_size: universe_size as usize,
        })
    }
}
