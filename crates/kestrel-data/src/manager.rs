//! Update manager: keeps the filing store fresh.
//!
//! The manager ties the EDGAR client, the filing store and the KPI
//! extractor together: it decides whether a ticker's stored filing is
//! stale, fetches the latest periodic filing when it is, grades the
//! extraction quality of the fetched text and records the result. Batch
//! updates isolate per-ticker failures so one bad ticker never aborts
//! the rest of the universe.

use crate::client::EdgarClient;
use crate::error::{DataError, Result};
use crate::store::{FilingRecord, FilingStore, QualityGrade};
use chrono::{DateTime, Duration, Utc};
use kestrel_extract::{ExtractError, KpiExtractor};
use serde::Serialize;
use tracing::{info, warn};

/// Default staleness threshold before a ticker is refreshed.
const DEFAULT_STALENESS_DAYS: i64 = 30;

/// Result of one ticker's update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    /// Ticker that was updated
    pub ticker: String,
    /// Whether the update succeeded
    pub success: bool,
    /// Filing date of the fetched (or already-current) filing
    pub filing_date: Option<chrono::NaiveDate>,
    /// Number of KPIs extracted from the fetched document
    pub kpis_extracted: usize,
    /// Error or status message
    pub message: Option<String>,
    /// When the update ran
    pub last_updated: DateTime<Utc>,
}

/// Orchestrates client, store and extractor for refresh operations.
#[derive(Debug)]
pub struct UpdateManager {
    client: EdgarClient,
    store: FilingStore,
    extractor: Option<KpiExtractor>,
    staleness: Duration,
}

impl UpdateManager {
    /// Create a manager with the default 30-day staleness threshold.
    ///
    /// The extractor is optional: without one, filings are fetched and
    /// stored but graded [`QualityGrade::Poor`].
    pub fn new(client: EdgarClient, store: FilingStore, extractor: Option<KpiExtractor>) -> Self {
        Self {
            client,
            store,
            extractor,
            staleness: Duration::days(DEFAULT_STALENESS_DAYS),
        }
    }

    /// Override the staleness threshold.
    pub fn with_staleness_days(mut self, days: i64) -> Self {
        self.staleness = Duration::days(days);
        self
    }

    /// The underlying filing store.
    pub fn store(&self) -> &FilingStore {
        &self.store
    }

    /// Whether a ticker's stored filing is missing or stale.
    pub fn needs_update(&self, ticker: &str) -> Result<bool> {
        match self.store.get_record(ticker)? {
            Some(record) => Ok(Utc::now() - record.last_updated >= self.staleness),
            None => Ok(true),
        }
    }

    /// Refresh one ticker, converting failures into an unsuccessful
    /// outcome rather than an error.
    pub async fn update_ticker(&self, ticker: &str, force: bool) -> UpdateOutcome {
        match self.try_update(ticker, force).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(ticker, %error, "update failed");
                UpdateOutcome {
                    ticker: ticker.to_string(),
                    success: false,
                    filing_date: None,
                    kpis_extracted: 0,
                    message: Some(error.to_string()),
                    last_updated: Utc::now(),
                }
            }
        }
    }

    async fn try_update(&self, ticker: &str, force: bool) -> Result<UpdateOutcome> {
        if !force && !self.needs_update(ticker)? {
            let record = self.store.get_record(ticker)?;
            return Ok(UpdateOutcome {
                ticker: ticker.to_string(),
                success: true,
                filing_date: record.map(|r| r.filing_date),
                kpis_extracted: 0,
                message: Some("data is current".to_string()),
                last_updated: Utc::now(),
            });
        }

        // Resolve the CIK from the universe first, falling back to the
        // SEC ticker file.
        let cik = match self.store.get_cik(ticker)? {
            Some(cik) => cik,
            None => self.client.get_company_cik(ticker).await?,
        };

        let filings = self.client.get_company_filings(&cik).await?;
        let filing = filings
            .latest_periodic()
            .ok_or_else(|| DataError::MissingData {
                ticker: ticker.to_string(),
                reason: "no recent 10-Q or 10-K filings".to_string(),
            })?;

        let content = self.client.get_filing_document(&cik, &filing).await?;

        let kpis_extracted = self.extract_count(ticker, &filing.primary_document, &content)?;

        let record = FilingRecord {
            ticker: ticker.to_string(),
            form: filing.form.clone(),
            filing_date: filing.filing_date,
            accession_number: filing.accession_number.clone(),
            primary_document: filing.primary_document.clone(),
            last_updated: Utc::now(),
            quality: QualityGrade::from_kpi_count(kpis_extracted),
        };
        self.store.put_filing(&record, &content)?;

        info!(
            ticker,
            form = %filing.form,
            filing_date = %filing.filing_date,
            kpis_extracted,
            "updated filing"
        );

        Ok(UpdateOutcome {
            ticker: ticker.to_string(),
            success: true,
            filing_date: Some(filing.filing_date),
            kpis_extracted,
            message: None,
            last_updated: record.last_updated,
        })
    }

    /// Run the extractor over fetched content, treating a missing ticker
    /// configuration as zero KPIs rather than a failure.
    fn extract_count(&self, ticker: &str, doc_id: &str, content: &str) -> Result<usize> {
        let Some(extractor) = &self.extractor else {
            return Ok(0);
        };

        match extractor.extract(content, doc_id, ticker) {
            Ok(kpis) => Ok(kpis.len()),
            Err(ExtractError::ConfigurationMissing(_)) => {
                warn!(ticker, "no KPI mappings configured, skipping extraction");
                Ok(0)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Refresh every active ticker in the universe, sequentially.
    ///
    /// Per-ticker failures are captured in their outcome; the batch
    /// always runs to completion.
    pub async fn update_universe(&self, force: bool) -> Result<Vec<UpdateOutcome>> {
        let universe = self.store.universe()?;
        let mut outcomes = Vec::with_capacity(universe.len());

        for (ticker, _cik) in universe {
            outcomes.push(self.update_ticker(&ticker, force).await);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_record(last_updated: DateTime<Utc>) -> UpdateManager {
        let store = FilingStore::in_memory().unwrap();
        store
            .put_filing(
                &FilingRecord {
                    ticker: "PPL".to_string(),
                    form: "10-Q".to_string(),
                    filing_date: chrono::NaiveDate::from_ymd_opt(2024, 7, 18).unwrap(),
                    accession_number: "0000922224-24-000041".to_string(),
                    primary_document: "ppl-20240630.htm".to_string(),
                    last_updated,
                    quality: QualityGrade::Good,
                },
                "content",
            )
            .unwrap();

        UpdateManager::new(EdgarClient::new().unwrap(), store, None)
    }

    #[test]
    fn test_unknown_ticker_needs_update() {
        let manager = UpdateManager::new(
            EdgarClient::new().unwrap(),
            FilingStore::in_memory().unwrap(),
            None,
        );
        assert!(manager.needs_update("PPL").unwrap());
    }

    #[test]
    fn test_fresh_record_does_not_need_update() {
        let manager = manager_with_record(Utc::now());
        assert!(!manager.needs_update("PPL").unwrap());
    }

    #[test]
    fn test_stale_record_needs_update() {
        let manager = manager_with_record(Utc::now() - Duration::days(45));
        assert!(manager.needs_update("PPL").unwrap());
    }

    #[test]
    fn test_staleness_threshold_override() {
        let manager = manager_with_record(Utc::now() - Duration::days(45));
        let manager = manager.with_staleness_days(90);
        assert!(!manager.needs_update("PPL").unwrap());
    }

    #[tokio::test]
    async fn test_current_data_short_circuits() {
        let manager = manager_with_record(Utc::now());
        let outcome = manager.update_ticker("PPL", false).await;

        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("data is current"));
        assert_eq!(outcome.kpis_extracted, 0);
        assert!(outcome.filing_date.is_some());
    }

    #[tokio::test]
    async fn test_empty_universe_is_empty_batch() {
        let manager = UpdateManager::new(
            EdgarClient::new().unwrap(),
            FilingStore::in_memory().unwrap(),
            None,
        );
        let outcomes = manager.update_universe(false).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires network access to sec.gov"]
    async fn test_live_update_isolates_failures() {
        let store = FilingStore::in_memory().unwrap();
        store.add_to_universe("KMI", "0001546291", None).unwrap();
        store.add_to_universe("ZZZZZZZZ", "0000000000", None).unwrap();

        let manager = UpdateManager::new(EdgarClient::new().unwrap(), store, None);
        let outcomes = manager.update_universe(true).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        // The bogus ticker fails without aborting the batch.
        assert!(outcomes.iter().any(|o| !o.success));
    }
}
