//! Per-symbol quote retrieval.
//!
//! A fetch is a single network round trip with a fixed timeout and no
//! retries; the next scheduled tick is the retry. Whatever happens, the
//! fetcher returns a [`Quote`]: transport failures, timeouts, and bad HTTP
//! statuses become `status=error` records carrying a short diagnostic, so
//! an individual symbol can never abort a tick.

use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use stock_common::TrackerError;
use stock_common::quote::Quote;

use crate::model::scrape::extract_quote;

/// Per-request timeout for the quote page fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser User-Agent; the quote source rejects obvious non-browser clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Source of canonical quotes, one symbol per call.
///
/// This is the seam between the scheduler and the network: production code
/// uses [`YahooFetcher`], tests substitute an in-memory stub.
pub trait QuoteFetcher: Send + Sync {
    /// Retrieves the current quote for `symbol`. Always returns a record,
    /// never fails past this boundary.
    fn fetch(&self, symbol: &str) -> Quote;
}

/// Fetcher scraping the public Yahoo Finance quote page.
pub struct YahooFetcher {
    client: reqwest::blocking::Client,
}

impl YahooFetcher {
    /// Builds the fetcher with its pooled HTTP client.
    pub fn new() -> Result<Self, TrackerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TrackerError::Format(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// One GET of the quote page. The cache-busting query parameter mirrors
    /// what a browser tab would send.
    fn fetch_document(&self, symbol: &str) -> Result<String, TrackerError> {
        let url = format!(
            "https://finance.yahoo.com/quote/{}?t={}",
            symbol,
            Utc::now().timestamp_millis()
        );
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Transport(format!(
                "HTTP {status} from quote page"
            )));
        }

        response
            .text()
            .map_err(|e| TrackerError::Parse(e.to_string()))
    }
}

impl QuoteFetcher for YahooFetcher {
    fn fetch(&self, symbol: &str) -> Quote {
        match self.fetch_document(symbol) {
            Ok(html) => extract_quote(symbol, &html),
            Err(e) => {
                warn!("Fetch failed for {}: {}", symbol, e);
                Quote::error(symbol, &e.to_string())
            }
        }
    }
}
