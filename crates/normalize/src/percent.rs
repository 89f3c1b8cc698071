//! Percent coercion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// First signed decimal in a string; `.` and `,` both accepted as separator.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+]?(?:\d+(?:[.,]\d+)?|[.,]\d+)").expect("number pattern is valid")
});

/// Coerce a fraction, whole number, or text into an integer percent.
///
/// Values `<= 1` are read as fractions and multiplied by 100; larger values
/// are taken as already being percentages. This makes `1` mean 100%, never
/// 1%: the backend gives no way to tell the two apart.
///
/// Returns `None` for null, empty or unparseable input, and for any JSON
/// type other than number or string.
pub fn normalize_percent(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(scale_percent),
        Value::String(s) => parse_first_number(s).and_then(scale_percent),
        _ => None,
    }
}

/// Extract the first signed decimal number embedded in `text`.
pub fn parse_first_number(text: &str) -> Option<f64> {
    let found = NUMBER_RE.find(text)?;
    found.as_str().replace(',', ".").parse::<f64>().ok()
}

fn scale_percent(raw: f64) -> Option<i64> {
    if !raw.is_finite() {
        return None;
    }
    let scaled = if raw <= 1.0 { raw * 100.0 } else { raw };
    Some(scaled.round() as i64)
}
