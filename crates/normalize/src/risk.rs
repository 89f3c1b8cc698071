//! Risk-on / risk-off flag coercion.

use serde_json::Value;

const RISK_ON_KEYWORDS: &[&str] = &["on", "risk-on", "riskon", "bull", "bullish"];
const RISK_OFF_KEYWORDS: &[&str] = &["off", "risk-off", "riskoff", "bear", "bearish"];

/// Tri-state risk flag: `Some(true)` risk-on, `Some(false)` risk-off,
/// `None` when the input carries no recognizable regime.
pub fn normalize_risk_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => {
            let lowered = s.trim().to_lowercase();
            if RISK_ON_KEYWORDS.contains(&lowered.as_str()) {
                Some(true)
            } else if RISK_OFF_KEYWORDS.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}
