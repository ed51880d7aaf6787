//! SEC EDGAR API client with rate limiting.

use crate::error::{DataError, Result};
use crate::filings::{CompanyFilings, FilingInfo};
use kestrel_facts::CompanyFacts;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL (hosted on www.sec.gov, not data.sec.gov)
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// User agent for SEC requests (SEC requires identifying information)
const USER_AGENT: &str = "Kestrel/0.1 (kestrel@kestrel-fin.dev)";

/// Company information from the tickers endpoint. The SEC returns
/// `{"0": {"cik_str": 1546291, "ticker": "KMI", "title": "Kinder Morgan"}, ...}`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CompanyInfo {
    /// CIK as a number (the SEC returns an integer despite the name)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
    /// Company name
    title: String,
}

/// Rate limiter to ensure we don't exceed the SEC's request ceiling.
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR API client.
///
/// All requests pass the interval rate limiter and carry the identifying
/// User-Agent the SEC requires.
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    base_url: String,
}

impl EdgarClient {
    /// Create a client with default settings (10 requests/second).
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a client with a custom minimum interval between requests.
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            base_url: EDGAR_BASE_URL.to_string(),
        })
    }

    /// Look up a company's CIK from its ticker symbol.
    ///
    /// # Errors
    /// [`DataError::CikNotFound`] if the ticker is unknown to the SEC.
    pub async fn get_company_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("empty ticker".to_string()));
        }
        let ticker_upper = ticker.to_uppercase();

        self.rate_limiter.lock().await.wait().await;

        let response = self.client.get(COMPANY_TICKERS_URL).send().await?;
        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyInfo> = response
            .json()
            .await
            .map_err(|e| DataError::EdgarApi(format!("failed to parse company tickers: {e}")))?;

        for company in data.values() {
            if company.ticker.to_uppercase() == ticker_upper {
                return Ok(pad_cik(&company.cik_str.to_string()));
            }
        }

        Err(DataError::CikNotFound(ticker.to_string()))
    }

    /// Fetch a company's filing history.
    pub async fn get_company_filings(&self, cik: &str) -> Result<CompanyFilings> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("empty CIK".to_string()));
        }
        let cik_padded = pad_cik(cik);

        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/submissions/CIK{}.json", self.base_url, cik_padded);
        debug!(%url, "fetching filing history");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "failed to fetch filings for CIK {}: HTTP {}",
                cik_padded,
                response.status()
            )));
        }

        let filings: CompanyFilings = response
            .json()
            .await
            .map_err(|e| DataError::EdgarApi(format!("failed to parse company filings: {e}")))?;
        Ok(filings)
    }

    /// Fetch the raw text of a filing's primary document.
    pub async fn get_filing_document(&self, cik: &str, filing: &FilingInfo) -> Result<String> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("empty CIK".to_string()));
        }

        self.rate_limiter.lock().await.wait().await;

        let url = filing.document_url(cik);
        debug!(%url, "fetching filing document");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "failed to fetch filing document: HTTP {}",
                response.status()
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|e| DataError::EdgarApi(format!("failed to read document content: {e}")))?;
        Ok(content)
    }

    /// Fetch the standardized companyfacts document for a CIK.
    pub async fn get_company_facts(&self, cik: &str) -> Result<CompanyFacts> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("empty CIK".to_string()));
        }
        let cik_padded = pad_cik(cik);

        self.rate_limiter.lock().await.wait().await;

        let url = format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            self.base_url, cik_padded
        );
        debug!(%url, "fetching companyfacts");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "failed to fetch companyfacts for CIK {}: HTTP {}",
                cik_padded,
                response.status()
            )));
        }

        let json = response.text().await?;
        Ok(CompanyFacts::from_json_str(&json)?)
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Pad a CIK to the 10 digits EDGAR URLs require.
fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik)
}
