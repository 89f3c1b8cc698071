//! Typed client for the COT Analysis Platform REST API.

use common::types::{
    CalendarEvent, CompleteAnalysis, CotRecord, EconomicSnapshot, PredictionRecord, ScrapeResult,
    SymbolList, SystemStatus, TechnicalSnapshot,
};
use common::{DashboardConfig, Result};
use normalize::adapt;
use std::time::Duration;
use tracing::{debug, info};

use crate::fetcher::CachedFetcher;

/// One method per endpoint. Every method takes a `bypass_cache` flag
/// except [`CotApiClient::run_scrape`], which is never cached.
#[derive(Clone)]
pub struct CotApiClient {
    fetcher: CachedFetcher,
    timeout: Duration,
    slow_timeout: Duration,
}

/// Percent-encode a symbol for use as a single path segment.
fn segment(symbol: &str) -> String {
    // form encoding writes spaces as '+' and escapes a literal '+'.
    url::form_urlencoded::byte_serialize(symbol.trim().as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl CotApiClient {
    pub fn new(fetcher: CachedFetcher, timeout: Duration, slow_timeout: Duration) -> Self {
        Self {
            fetcher,
            timeout,
            slow_timeout,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let fetcher = CachedFetcher::from_config(config)?;
        Ok(Self::new(fetcher, config.fetch.timeout(), config.fetch.slow_timeout()))
    }

    pub fn fetcher(&self) -> &CachedFetcher {
        &self.fetcher
    }

    pub fn clear_cache(&self) {
        self.fetcher.clear_cache();
    }

    async fn get(&self, path: &str, bypass_cache: bool) -> Result<serde_json::Value> {
        let fetched = self
            .fetcher
            .fetch_with_origin(path, bypass_cache, self.timeout)
            .await?;
        debug!("{} served as {:?}", path, fetched.origin);
        Ok(fetched.value)
    }

    async fn get_slow(&self, path: &str, bypass_cache: bool) -> Result<serde_json::Value> {
        let fetched = self
            .fetcher
            .fetch_with_origin(path, bypass_cache, self.slow_timeout)
            .await?;
        debug!("{} served as {:?}", path, fetched.origin);
        Ok(fetched.value)
    }

    pub async fn symbols(&self, bypass_cache: bool) -> Result<SymbolList> {
        let payload = self.get("/api/symbols", bypass_cache).await?;
        Ok(adapt::adapt_symbols(&payload))
    }

    /// COT history for the last `days` days, newest first.
    pub async fn cot_history(&self, symbol: &str, days: u32, bypass_cache: bool) -> Result<Vec<CotRecord>> {
        let path = format!("/api/data/{}?days={}", segment(symbol), days);
        let payload = self.get(&path, bypass_cache).await?;
        Ok(adapt::adapt_cot_history(&payload))
    }

    pub async fn complete_analysis(&self, symbol: &str, bypass_cache: bool) -> Result<CompleteAnalysis> {
        let path = format!("/api/analysis/complete/{}", segment(symbol));
        let payload = self.get_slow(&path, bypass_cache).await?;
        Ok(adapt::adapt_complete_analysis(&payload))
    }

    pub async fn technical(&self, symbol: &str, bypass_cache: bool) -> Result<TechnicalSnapshot> {
        let path = format!("/api/technical/{}", segment(symbol));
        let payload = self.get(&path, bypass_cache).await?;
        Ok(adapt::adapt_technical(&payload))
    }

    pub async fn economic_current(&self, bypass_cache: bool) -> Result<EconomicSnapshot> {
        let payload = self.get("/api/economic/current", bypass_cache).await?;
        Ok(adapt::adapt_economic(&payload))
    }

    pub async fn economic_calendar(&self, bypass_cache: bool) -> Result<Vec<CalendarEvent>> {
        let payload = self.get("/api/economic/calendar", bypass_cache).await?;
        Ok(adapt::adapt_calendar(&payload))
    }

    pub async fn predictions(&self, symbol: &str, bypass_cache: bool) -> Result<Vec<PredictionRecord>> {
        let path = format!("/api/predictions/{}", segment(symbol));
        let payload = self.get(&path, bypass_cache).await?;
        Ok(adapt::adapt_predictions(&payload))
    }

    pub async fn system_status(&self, bypass_cache: bool) -> Result<SystemStatus> {
        let payload = self.get("/api/system/status", bypass_cache).await?;
        Ok(adapt::adapt_system_status(&payload))
    }

    /// Trigger a fresh scrape and analysis run on the backend.
    pub async fn run_scrape(&self, symbol: &str) -> Result<ScrapeResult> {
        let path = format!("/api/scrape/{}", segment(symbol));
        info!("Starting scrape for {}", symbol);
        let payload = self.fetcher.fetch_uncached(&path, self.slow_timeout).await?;
        Ok(adapt::adapt_scrape_result(&payload))
    }
}
