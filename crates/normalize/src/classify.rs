//! Signal, direction and sentiment classification.

use common::types::{AlertKind, Direction, ProximityAlert, SentimentBand, Signal, TechnicalSnapshot};

fn canonical_label(raw: &str) -> String {
    raw.trim().to_uppercase().replace([' ', '-'], "_")
}

/// Map a free-form technical signal (`strong_buy`, `SELL`, `bullish`, ...)
/// onto [`Signal`].
pub fn classify_signal(raw: &str) -> Signal {
    let label = canonical_label(raw);
    if label.contains("STRONG_BUY") {
        Signal::StrongBuy
    } else if label.contains("BUY") || label == "BULLISH" {
        Signal::Buy
    } else if label.contains("STRONG_SELL") {
        Signal::StrongSell
    } else if label.contains("SELL") || label == "BEARISH" {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

/// Map a model bias (`BULLISH`, `BUY`, `moderately bearish`, ...) onto
/// [`Direction`].
pub fn classify_direction(raw: &str) -> Direction {
    let label = canonical_label(raw);
    if label.contains("BULLISH") || label.contains("BUY") {
        Direction::Bullish
    } else if label.contains("BEARISH") || label.contains("SELL") {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

pub fn sentiment_band(score: f64) -> SentimentBand {
    if score > 20.0 {
        SentimentBand::StrongBullish
    } else if score > 10.0 {
        SentimentBand::Bullish
    } else if score < -20.0 {
        SentimentBand::StrongBearish
    } else if score < -10.0 {
        SentimentBand::Bearish
    } else {
        SentimentBand::Neutral
    }
}

/// Alerts for a price within `threshold_pct` percent of resistance or support.
pub fn proximity_alerts(tech: &TechnicalSnapshot, threshold_pct: f64) -> Vec<ProximityAlert> {
    let mut alerts = Vec::new();

    if let Some(dist) = tech.distance_to_resistance.filter(|d| d.is_finite()) {
        if dist <= threshold_pct {
            alerts.push(ProximityAlert {
                kind: AlertKind::NearResistance,
                distance_pct: dist,
            });
        }
    }
    if let Some(dist) = tech.distance_to_support.filter(|d| d.is_finite()) {
        if dist <= threshold_pct {
            alerts.push(ProximityAlert {
                kind: AlertKind::NearSupport,
                distance_pct: dist,
            });
        }
    }

    alerts
}
