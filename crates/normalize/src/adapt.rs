//! Payload adapters: backend JSON → canonical schema.
//!
//! Every adapter is total. Fields the payload lacks come back as `None` or a
//! neutral default, so one malformed section never hides the rest of a
//! response.

use chrono::NaiveDate;
use common::types::{
    AiAnalysis, CalendarEvent, CompleteAnalysis, CotRecord, Direction, EconomicIndicator,
    EconomicSnapshot, FedWatchEntry, MlPrediction, Positioning, PredictionRecord, QuantMetrics,
    RiskRegime, Scenarios, ScrapeResult, SymbolInfo, SymbolList, SystemStatus, TechnicalSnapshot,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::classify::{classify_direction, classify_signal};
use crate::percent::normalize_percent;
use crate::risk::normalize_risk_flag;
use crate::search::{deep_find_by_key, first_truthy, lenient_f64, signals_error, text_of};

static NULL: Value = Value::Null;

/// Error text of a backend-signaled error, if any.
pub fn error_text(payload: &Value) -> Option<String> {
    if signals_error(payload) {
        payload.get("error").and_then(text_of)
    } else {
        None
    }
}

fn field<'a>(obj: &'a Value, key: &str) -> &'a Value {
    obj.get(key).unwrap_or(&NULL)
}

fn opt_text(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(text_of)
}

fn opt_f64(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(lenient_f64)
}

fn whole(obj: &Value, key: &str) -> i64 {
    opt_f64(obj, key).map(|v| v.round() as i64).unwrap_or(0)
}

/// Accepts `YYYY-MM-DD` or any ISO timestamp starting with one.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?;
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ── Symbols ───────────────────────────────────────────────────────────

/// `/api/symbols` has been served as a bare array, as `{symbols, limit,
/// message}`, and as a map keyed by symbol code.
pub fn adapt_symbols(payload: &Value) -> SymbolList {
    match payload {
        Value::Array(items) => SymbolList {
            symbols: symbols_from_array(items),
            limit: None,
            message: None,
        },
        Value::Object(map) => {
            let limit = map
                .get("limit")
                .and_then(lenient_f64)
                .filter(|l| *l > 0.0)
                .map(|l| l as u32);
            let message = map.get("message").and_then(text_of);
            let symbols = match map.get("symbols") {
                Some(Value::Array(items)) => symbols_from_array(items),
                Some(Value::Object(inner)) => symbols_from_map(inner),
                _ => symbols_from_map(map),
            };
            SymbolList {
                symbols,
                limit,
                message,
            }
        }
        _ => {
            debug!("Unrecognized symbols payload: {}", payload);
            SymbolList::default()
        }
    }
}

fn symbols_from_array(items: &[Value]) -> Vec<SymbolInfo> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(code) if !code.trim().is_empty() => Some(SymbolInfo {
                code: code.clone(),
                name: code.clone(),
                category: None,
            }),
            Value::Object(_) => {
                let code = opt_text(item, "code").or_else(|| opt_text(item, "symbol"))?;
                Some(SymbolInfo {
                    name: opt_text(item, "name").unwrap_or_else(|| code.clone()),
                    category: opt_text(item, "category"),
                    code,
                })
            }
            _ => None,
        })
        .collect()
}

/// In the keyed shape the map key is the API code; an inner `code` is the
/// exchange contract code and is ignored.
fn symbols_from_map(map: &Map<String, Value>) -> Vec<SymbolInfo> {
    map.iter()
        .filter(|(key, _)| !matches!(key.as_str(), "limit" | "message" | "error"))
        .filter_map(|(key, entry)| match entry {
            Value::String(name) => Some(SymbolInfo {
                code: key.clone(),
                name: name.clone(),
                category: None,
            }),
            Value::Object(_) => Some(SymbolInfo {
                code: key.clone(),
                name: opt_text(entry, "name").unwrap_or_else(|| key.clone()),
                category: opt_text(entry, "category"),
            }),
            _ => None,
        })
        .collect()
}

// ── COT ───────────────────────────────────────────────────────────────

pub fn adapt_cot_record(row: &Value) -> CotRecord {
    CotRecord {
        symbol: opt_text(row, "symbol"),
        date: parse_date(field(row, "date")),
        non_commercial_long: whole(row, "non_commercial_long"),
        non_commercial_short: whole(row, "non_commercial_short"),
        commercial_long: whole(row, "commercial_long"),
        commercial_short: whole(row, "commercial_short"),
        net_position: whole(row, "net_position"),
        sentiment_score: opt_f64(row, "sentiment_score").unwrap_or(0.0),
    }
}

/// COT history, newest first as served. Accepts a bare array or an object
/// wrapping it under `data`.
pub fn adapt_cot_history(payload: &Value) -> Vec<CotRecord> {
    let rows: &[Value] = match payload {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(_) => match payload.get("data") {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    rows.iter()
        .filter(|row| row.is_object())
        .map(adapt_cot_record)
        .collect()
}

// ── Analysis ──────────────────────────────────────────────────────────

pub fn adapt_ml_prediction(value: &Value) -> Option<MlPrediction> {
    if !value.is_object() {
        return None;
    }
    let bias = opt_text(value, "direction").unwrap_or_else(|| "NEUTRAL".into());
    let confidence = value
        .get("confidence")
        .and_then(normalize_percent)
        .filter(|c| *c != 0)
        .unwrap_or(50);
    Some(MlPrediction {
        direction: classify_direction(&bias),
        confidence,
    })
}

/// AI commentary. A plain string payload is treated as the summary.
pub fn adapt_ai_analysis(value: &Value) -> Option<AiAnalysis> {
    let wrapped;
    let obj = match value {
        Value::String(text) if !text.trim().is_empty() => {
            wrapped = serde_json::json!({ "text": text });
            &wrapped
        }
        Value::Object(_) => value,
        _ => return None,
    };

    let bias = first_truthy(obj, &["direction", "trading_bias"])
        .and_then(text_of)
        .unwrap_or_else(|| "NEUTRAL".into())
        .to_uppercase();

    let confidence = obj
        .get("confidence")
        .and_then(normalize_percent)
        .or_else(|| deep_find_by_key(obj, "confidence").and_then(normalize_percent));

    let summary = first_truthy(obj, &["reasoning", "summary", "text", "market_outlook"])
        .and_then(text_of);

    let actionable_insights = match first_truthy(obj, &["actionable_insights", "action_items"]) {
        Some(Value::Array(items)) => items.iter().filter_map(text_of).collect(),
        Some(other) => text_of(other).into_iter().collect(),
        None => Vec::new(),
    };

    let scenarios = obj.get("scenarios").filter(|s| s.is_object()).map(|s| Scenarios {
        bullish_case: opt_text(s, "bullish_case"),
        bearish_case: opt_text(s, "bearish_case"),
        most_likely: opt_text(s, "most_likely"),
    });

    let positioning = obj
        .get("positioning_analysis")
        .filter(|p| p.is_object())
        .map(|p| Positioning {
            non_commercial: opt_text(p, "non_commercial"),
            commercial: opt_text(p, "commercial"),
            divergence: opt_text(p, "divergence"),
        });

    let quantitative_metrics = obj
        .get("quantitative_metrics")
        .filter(|q| q.is_object())
        .map(|q| QuantMetrics {
            net_position_percentile: opt_text(q, "net_position_percentile"),
            sentiment_strength: opt_text(q, "sentiment_strength"),
            positioning_extreme: opt_text(q, "positioning_extreme"),
        });

    Some(AiAnalysis {
        direction: classify_direction(&bias),
        bias,
        confidence,
        summary,
        market_outlook: opt_text(obj, "market_outlook"),
        key_factors: first_truthy(obj, &["key_factors", "factors"]).and_then(text_of),
        risks: first_truthy(obj, &["risks", "risk_factors"]).and_then(text_of),
        actionable_insights,
        scenarios,
        positioning,
        quantitative_metrics,
    })
}

fn adapt_prediction_record(row: &Value) -> PredictionRecord {
    PredictionRecord {
        date: parse_date(field(row, "date")),
        direction: opt_text(row, "direction")
            .map(|d| classify_direction(&d))
            .unwrap_or(Direction::Neutral),
        confidence: row.get("confidence").and_then(normalize_percent),
        ml_score: opt_f64(row, "ml_score"),
        has_ai_analysis: first_truthy(row, &["gpt_analysis"]).is_some(),
    }
}

/// `/api/predictions/{symbol}`: array of historical predictions.
pub fn adapt_predictions(payload: &Value) -> Vec<PredictionRecord> {
    payload
        .as_array()
        .map(|rows| rows.iter().map(adapt_prediction_record).collect())
        .unwrap_or_default()
}

/// `/api/analysis/complete/{symbol}`.
///
/// COT data lives under `cot_data` or `latest_cot`; the AI commentary under
/// `gpt_analysis` or `ml_prediction.gpt_analysis`, depending on revision.
pub fn adapt_complete_analysis(payload: &Value) -> CompleteAnalysis {
    let cot = first_truthy(payload, &["cot_data", "latest_cot"])
        .filter(|c| c.is_object())
        .map(adapt_cot_record);

    let ml = field(payload, "ml_prediction");
    let ai_source = first_truthy(payload, &["gpt_analysis"])
        .or_else(|| first_truthy(ml, &["gpt_analysis"]));

    CompleteAnalysis {
        symbol: opt_text(payload, "symbol"),
        cot,
        ml_prediction: adapt_ml_prediction(ml),
        ai_analysis: ai_source.and_then(adapt_ai_analysis),
        recent_predictions: adapt_predictions(field(payload, "recent_predictions")),
        error: error_text(payload),
    }
}

/// `/api/scrape/{symbol}`; the analysis may be at the root or under `data`.
pub fn adapt_scrape_result(payload: &Value) -> ScrapeResult {
    let data = field(payload, "data");
    let ai_source = first_truthy(payload, &["gpt_analysis"]).or_else(|| first_truthy(data, &["gpt_analysis"]));
    ScrapeResult {
        status: opt_text(payload, "status"),
        ai_analysis: ai_source.and_then(adapt_ai_analysis),
        ml_prediction: adapt_ml_prediction(field(payload, "ml_prediction")),
        error: error_text(payload),
    }
}

// ── Technical ─────────────────────────────────────────────────────────

/// `/api/technical/{symbol}`. An error payload that carries a `fallback`
/// analysis is adapted from the fallback and keeps the error text.
pub fn adapt_technical(payload: &Value) -> TechnicalSnapshot {
    let error = error_text(payload);
    let source = match payload.get("fallback") {
        Some(fallback) if error.is_some() && fallback.is_object() => fallback,
        _ => payload,
    };

    let overall = field(field(source, "signals"), "overall");
    let indicators = field(source, "indicators");

    TechnicalSnapshot {
        current_price: opt_f64(source, "current_price"),
        trend_bias: opt_text(source, "trend_bias").unwrap_or_else(|| "NEUTRAL".into()),
        strong_support: opt_f64(source, "strong_support"),
        strong_resistance: opt_f64(source, "strong_resistance"),
        distance_to_support: opt_f64(source, "distance_to_support"),
        distance_to_resistance: opt_f64(source, "distance_to_resistance"),
        signal: classify_signal(&opt_text(overall, "signal").unwrap_or_default()),
        signal_confidence: opt_f64(overall, "confidence")
            .filter(|c| *c != 0.0)
            .map(|c| c.round() as i64)
            .unwrap_or(50),
        weighted_score: opt_f64(overall, "weighted_score").unwrap_or(0.0),
        rsi14: opt_f64(indicators, "rsi14"),
        sma50: opt_f64(indicators, "sma50"),
        sma200: opt_f64(indicators, "sma200"),
        error,
    }
}

// ── Economic ──────────────────────────────────────────────────────────

fn adapt_indicators(indicators: &Value) -> Vec<EconomicIndicator> {
    let Some(map) = indicators.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, entry)| match entry {
            Value::Object(_) => Some(EconomicIndicator {
                key: key.clone(),
                value: opt_f64(entry, "value"),
                change: opt_f64(entry, "change"),
                trend: opt_text(entry, "trend"),
            }),
            _ => None,
        })
        .collect()
}

/// Fed watch as `[{rate, prob}]` or as `{label: probability}`; non-numeric
/// members of the map form (commentary strings) are skipped.
fn adapt_fed_watch(value: &Value) -> Vec<FedWatchEntry> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| FedWatchEntry {
                label: opt_text(item, "rate").unwrap_or_else(|| "—".into()),
                probability: opt_f64(item, "prob").or_else(|| opt_f64(item, "probability")),
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(label, prob)| {
                lenient_f64(prob).map(|p| FedWatchEntry {
                    label: label.clone(),
                    probability: Some(p),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn market_sentiment_label(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => opt_text(value, "overall_sentiment"),
        Value::Number(_) | Value::String(_) => text_of(value).map(|s| format!("{s}%")),
        _ => None,
    }
}

/// Risk regime from explicit `risk_on` / `risk_off` fields, then from the
/// overall market sentiment.
pub fn risk_regime(payload: &Value) -> RiskRegime {
    if let Some(flag) = payload.get("risk_on").and_then(normalize_risk_flag) {
        return regime_from_flag(flag);
    }
    if let Some(flag) = payload.get("risk_off").and_then(normalize_risk_flag) {
        return regime_from_flag(!flag);
    }
    if let Some(flag) = payload.get("risk_regime").and_then(normalize_risk_flag) {
        return regime_from_flag(flag);
    }

    let sentiment = field(field(payload, "market_sentiment"), "overall_sentiment");
    match normalize_risk_flag(sentiment) {
        Some(flag) => regime_from_flag(flag),
        None => RiskRegime {
            flag: None,
            label: text_of(sentiment).unwrap_or_else(|| "—".into()),
        },
    }
}

fn regime_from_flag(flag: bool) -> RiskRegime {
    RiskRegime {
        flag: Some(flag),
        label: if flag { "Risk-ON" } else { "Risk-OFF" }.into(),
    }
}

/// `/api/economic/current`.
pub fn adapt_economic(payload: &Value) -> EconomicSnapshot {
    let indicators = payload
        .get("key_indicators")
        .filter(|k| k.is_object())
        .unwrap_or(payload);
    let fed_watch = first_truthy(payload, &["fed_watch", "fedWatch"]).unwrap_or(&NULL);

    EconomicSnapshot {
        indicators: adapt_indicators(indicators)
            .into_iter()
            .filter(|i| !matches!(i.key.as_str(), "market_sentiment" | "fed_watch" | "fedWatch"))
            .collect(),
        fed_watch: adapt_fed_watch(fed_watch),
        market_sentiment: market_sentiment_label(field(payload, "market_sentiment")),
        risk_regime: risk_regime(payload),
        error: error_text(payload),
    }
}

/// `/api/economic/calendar`.
pub fn adapt_calendar(payload: &Value) -> Vec<CalendarEvent> {
    let Some(events) = field(payload, "events").as_array() else {
        return Vec::new();
    };
    events
        .iter()
        .filter(|e| e.is_object())
        .map(|e| CalendarEvent {
            date: opt_text(e, "date"),
            time: opt_text(e, "time"),
            event: first_truthy(e, &["event", "title", "name"])
                .and_then(text_of)
                .unwrap_or_else(|| "—".into()),
            impact: opt_text(e, "impact").unwrap_or_default().to_lowercase(),
            country: opt_text(e, "country"),
        })
        .collect()
}

// ── System ────────────────────────────────────────────────────────────

/// Component status from `components.<name>.status`, `<name>.status` or
/// `<name>_status`, trying each alias in order; `OK` when none is present.
fn component_status(payload: &Value, aliases: &[&str]) -> String {
    let components = field(payload, "components");
    for alias in aliases {
        let found = field(field(components, alias), "status")
            .as_str()
            .or_else(|| field(field(payload, alias), "status").as_str())
            .or_else(|| field(payload, &format!("{alias}_status")).as_str());
        if let Some(status) = found.filter(|s| !s.is_empty()) {
            return status.to_string();
        }
    }
    "OK".into()
}

/// `/api/system/status`.
pub fn adapt_system_status(payload: &Value) -> SystemStatus {
    SystemStatus {
        online: !signals_error(payload),
        database: component_status(payload, &["database", "db"]),
        openai: component_status(payload, &["openai", "openai_api"]),
        ml: component_status(payload, &["ml", "machine_learning"]),
        scraper: component_status(payload, &["selenium", "scraper"]),
    }
}
