//! Canonical dashboard schema.
//!
//! Backend payloads drift between revisions; the adapters in the
//! `normalize` crate map every known shape onto these types once, at the
//! boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Symbols ───────────────────────────────────────────────────────────

/// A tradable COT symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Code used in API paths (e.g. `GOLD`).
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Response of `/api/symbols`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymbolList {
    pub symbols: Vec<SymbolInfo>,
    /// Plan limit on visible symbols, when the backend reports one.
    pub limit: Option<u32>,
    /// Human-readable notice accompanying the limit.
    pub message: Option<String>,
}

// ── COT data ──────────────────────────────────────────────────────────

/// One weekly Commitment of Traders report row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CotRecord {
    pub symbol: Option<String>,
    pub date: Option<NaiveDate>,
    pub non_commercial_long: i64,
    pub non_commercial_short: i64,
    pub commercial_long: i64,
    pub commercial_short: i64,
    pub net_position: i64,
    /// Signed sentiment in percent, roughly -100..=100.
    pub sentiment_score: f64,
}

// ── Classifications ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

/// Technical signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

/// Interpretation of a COT sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentBand {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

// ── Analysis ──────────────────────────────────────────────────────────

/// Model prediction attached to a complete analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlPrediction {
    pub direction: Direction,
    /// Confidence in percent; 50 when the backend omits it.
    pub confidence: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scenarios {
    pub bullish_case: Option<String>,
    pub bearish_case: Option<String>,
    pub most_likely: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Positioning {
    pub non_commercial: Option<String>,
    pub commercial: Option<String>,
    pub divergence: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantMetrics {
    pub net_position_percentile: Option<String>,
    pub sentiment_strength: Option<String>,
    pub positioning_extreme: Option<String>,
}

/// AI-generated market commentary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiAnalysis {
    /// Upper-cased bias as written by the model (e.g. `BULLISH`, `STRONG_BUY`).
    pub bias: String,
    pub direction: Direction,
    pub confidence: Option<i64>,
    pub summary: Option<String>,
    pub market_outlook: Option<String>,
    pub key_factors: Option<String>,
    pub risks: Option<String>,
    pub actionable_insights: Vec<String>,
    pub scenarios: Option<Scenarios>,
    pub positioning: Option<Positioning>,
    pub quantitative_metrics: Option<QuantMetrics>,
}

/// Historical prediction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub date: Option<NaiveDate>,
    pub direction: Direction,
    pub confidence: Option<i64>,
    pub ml_score: Option<f64>,
    pub has_ai_analysis: bool,
}

/// Response of `/api/analysis/complete/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompleteAnalysis {
    pub symbol: Option<String>,
    pub cot: Option<CotRecord>,
    pub ml_prediction: Option<MlPrediction>,
    pub ai_analysis: Option<AiAnalysis>,
    pub recent_predictions: Vec<PredictionRecord>,
    /// Backend-signaled error text, if the payload carried one.
    pub error: Option<String>,
}

/// Response of `/api/scrape/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapeResult {
    pub status: Option<String>,
    pub ai_analysis: Option<AiAnalysis>,
    pub ml_prediction: Option<MlPrediction>,
    pub error: Option<String>,
}

// ── Technical ─────────────────────────────────────────────────────────

/// Response of `/api/technical/{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSnapshot {
    pub current_price: Option<f64>,
    pub trend_bias: String,
    pub strong_support: Option<f64>,
    pub strong_resistance: Option<f64>,
    /// Percent distance from the current price to support.
    pub distance_to_support: Option<f64>,
    /// Percent distance from the current price to resistance.
    pub distance_to_resistance: Option<f64>,
    pub signal: Signal,
    pub signal_confidence: i64,
    pub weighted_score: f64,
    pub rsi14: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    NearSupport,
    NearResistance,
}

/// Price sitting close to a key technical level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityAlert {
    pub kind: AlertKind,
    pub distance_pct: f64,
}

// ── Economic ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicIndicator {
    pub key: String,
    pub value: Option<f64>,
    pub change: Option<f64>,
    pub trend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FedWatchEntry {
    pub label: String,
    /// Probability in percent.
    pub probability: Option<f64>,
}

/// Risk-on / risk-off regime with the label shown to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRegime {
    /// `Some(true)` risk-on, `Some(false)` risk-off, `None` unknown.
    pub flag: Option<bool>,
    pub label: String,
}

/// Response of `/api/economic/current`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicSnapshot {
    pub indicators: Vec<EconomicIndicator>,
    pub fed_watch: Vec<FedWatchEntry>,
    pub market_sentiment: Option<String>,
    pub risk_regime: RiskRegime,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub date: Option<String>,
    pub time: Option<String>,
    pub event: String,
    /// Lower-cased impact (`high`, `medium`, `low`), empty when unknown.
    pub impact: String,
    pub country: Option<String>,
}

// ── System ────────────────────────────────────────────────────────────

/// Response of `/api/system/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub online: bool,
    pub database: String,
    pub openai: String,
    pub ml: String,
    pub scraper: String,
}
