//! Per-session dashboard state and reload flows.
//!
//! The selected symbol and history window live here rather than in globals;
//! every load is driven from a `DashboardContext`.

use common::types::{
    CalendarEvent, CompleteAnalysis, CotRecord, EconomicSnapshot, ProximityAlert, ScrapeResult,
    SentimentBand, SymbolList, SystemStatus, TechnicalSnapshot,
};
use common::{DashboardConfig, Result};
use normalize::{proximity_alerts, sentiment_band};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::CotApiClient;

/// Days of history behind the overview's net-change figure.
const OVERVIEW_DAYS: u32 = 90;

/// Outcome of loading one dashboard panel. Panels fail independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    Failed(String),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            Panel::Failed(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }
}

impl<T> From<Result<T>> for Panel<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Panel::Ready(value),
            Err(err) => Panel::Failed(err.to_string()),
        }
    }
}

/// Headline view of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub symbol: String,
    pub analysis: CompleteAnalysis,
    /// Latest COT row, from the analysis or else the history.
    pub latest: Option<CotRecord>,
    /// Net position change between the two most recent reports; `None` when
    /// fewer than two rows exist or the difference does not fit in `i64`.
    pub net_change: Option<i64>,
    pub sentiment: Option<SentimentBand>,
    /// The backend answered for a different symbol than requested.
    pub symbol_mismatch: bool,
}

/// Result of [`DashboardContext::reload_all`].
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub symbol: String,
    pub overview: Panel<Overview>,
    pub history: Panel<Vec<CotRecord>>,
}

/// Every panel of the dashboard for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub symbol: String,
    pub days: u32,
    pub overview: Panel<Overview>,
    pub history: Panel<Vec<CotRecord>>,
    pub technical: Panel<TechnicalSnapshot>,
    pub alerts: Panel<Vec<ProximityAlert>>,
    pub economic: Panel<EconomicSnapshot>,
    pub calendar: Panel<Vec<CalendarEvent>>,
    pub status: Panel<SystemStatus>,
}

pub struct DashboardContext {
    api: CotApiClient,
    current_symbol: String,
    selected_days: u32,
    settle_delay: Duration,
    proximity_pct: f64,
}

fn net_change(history: &[CotRecord]) -> Option<i64> {
    match history {
        [latest, previous, ..] => latest.net_position.checked_sub(previous.net_position),
        _ => None,
    }
}

impl DashboardContext {
    pub fn new(api: CotApiClient, config: &DashboardConfig) -> Self {
        Self {
            api,
            current_symbol: config.refresh.default_symbol.clone(),
            selected_days: config.refresh.history_days,
            settle_delay: Duration::from_millis(config.refresh.settle_delay_ms),
            proximity_pct: config.alerts.proximity_pct,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Ok(Self::new(CotApiClient::from_config(config)?, config))
    }

    pub fn api(&self) -> &CotApiClient {
        &self.api
    }

    pub fn current_symbol(&self) -> &str {
        &self.current_symbol
    }

    pub fn selected_days(&self) -> u32 {
        self.selected_days
    }

    pub fn set_days(&mut self, days: u32) {
        self.selected_days = days;
    }

    pub async fn symbols(&self, bypass_cache: bool) -> Result<SymbolList> {
        self.api.symbols(bypass_cache).await
    }

    /// Select `code` without loading anything.
    pub fn set_symbol(&mut self, code: &str) {
        self.current_symbol = code.trim().to_string();
    }

    /// Switch to `code` and force a reload. Returns `None` when `code` is
    /// already selected.
    pub async fn select_symbol(&mut self, code: &str) -> Option<ReloadReport> {
        let code = code.trim();
        if code == self.current_symbol {
            return None;
        }
        info!("Switching symbol {} -> {}", self.current_symbol, code);
        self.current_symbol = code.to_string();
        Some(self.reload_all(true).await)
    }

    /// Reload the overview and history panels. `force` clears the cache and
    /// bypasses it for the requests made here.
    pub async fn reload_all(&self, force: bool) -> ReloadReport {
        if force {
            self.api.clear_cache();
        }
        info!(
            "Reloading {} ({} days, force={})",
            self.current_symbol, self.selected_days, force
        );

        let (overview, history) = tokio::join!(
            self.load_overview(&self.current_symbol, force),
            self.api
                .cot_history(&self.current_symbol, self.selected_days, force),
        );

        ReloadReport {
            symbol: self.current_symbol.clone(),
            overview: overview.into(),
            history: history.into(),
        }
    }

    /// Complete analysis plus the 90-day COT history for `symbol`.
    ///
    /// A failed history load only costs the net-change figure.
    pub async fn load_overview(&self, symbol: &str, bypass_cache: bool) -> Result<Overview> {
        let (analysis, history) = tokio::join!(
            self.api.complete_analysis(symbol, bypass_cache),
            self.api.cot_history(symbol, OVERVIEW_DAYS, bypass_cache),
        );
        let analysis = analysis?;
        let history = history.unwrap_or_else(|e| {
            warn!("COT history for {} unavailable: {}", symbol, e);
            Vec::new()
        });

        let symbol_mismatch = match analysis.symbol.as_deref() {
            Some(returned) if !returned.eq_ignore_ascii_case(symbol) => {
                warn!("Requested {} but analysis is for {}", symbol, returned);
                true
            }
            _ => false,
        };

        let latest = analysis.cot.clone().or_else(|| history.first().cloned());
        let sentiment = latest.as_ref().map(|c| sentiment_band(c.sentiment_score));

        Ok(Overview {
            symbol: symbol.to_string(),
            net_change: net_change(&history),
            latest,
            sentiment,
            symbol_mismatch,
            analysis,
        })
    }

    /// Load every panel concurrently.
    pub async fn load_all(&self, bypass_cache: bool) -> DashboardSnapshot {
        let symbol = self.current_symbol.as_str();
        let (overview, history, technical, economic, calendar, status) = tokio::join!(
            self.load_overview(symbol, bypass_cache),
            self.api.cot_history(symbol, self.selected_days, bypass_cache),
            self.api.technical(symbol, bypass_cache),
            self.api.economic_current(bypass_cache),
            self.api.economic_calendar(bypass_cache),
            self.api.system_status(bypass_cache),
        );

        let technical: Panel<TechnicalSnapshot> = technical.into();
        let alerts = match &technical {
            Panel::Ready(tech) => Panel::Ready(proximity_alerts(tech, self.proximity_pct)),
            Panel::Failed(reason) => Panel::Failed(reason.clone()),
        };

        DashboardSnapshot {
            symbol: symbol.to_string(),
            days: self.selected_days,
            overview: overview.into(),
            history: history.into(),
            technical,
            alerts,
            economic: economic.into(),
            calendar: calendar.into(),
            status: status.into(),
        }
    }

    /// Price alerts for the selected symbol.
    pub async fn alerts(&self, bypass_cache: bool) -> Result<Vec<ProximityAlert>> {
        let tech = self.api.technical(&self.current_symbol, bypass_cache).await?;
        Ok(proximity_alerts(&tech, self.proximity_pct))
    }

    /// Scrape fresh data, then reload once the backend has settled.
    ///
    /// A scrape that fails at the transport level skips the reload; a
    /// payload-level error still reloads so the panels reflect whatever the
    /// backend stored.
    pub async fn run_full_analysis(&self) -> Result<(ScrapeResult, ReloadReport)> {
        let scrape = self.api.run_scrape(&self.current_symbol).await?;
        match &scrape.error {
            Some(error) => warn!("Scrape for {} reported: {}", self.current_symbol, error),
            None => info!("Scrape for {} finished", self.current_symbol),
        }

        self.api.clear_cache();
        tokio::time::sleep(self.settle_delay).await;
        let report = self.reload_all(true).await;
        Ok((scrape, report))
    }
}
