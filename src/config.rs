//! Configuration loader: `.env`, optional `config.toml`, then `COT_*`
//! environment overrides.

use common::{DashboardConfig, Error};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_non_negative_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer >= 0")))
}

fn parse_non_negative_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number >= 0")))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(Error::Config(format!("{env_name} must be a number >= 0")));
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

/// True when `url` carries anything after the authority besides `/`.
fn has_path(url: &str) -> bool {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    match after_scheme.find(['/', '?', '#']) {
        Some(idx) => !after_scheme[idx..].trim_end_matches('/').is_empty(),
        None => false,
    }
}

pub fn validate_config(config: &DashboardConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    let base = config.api.base_url.trim();
    if base.is_empty() {
        issues.push("api.base_url must not be empty".into());
    } else if !(base.starts_with("http://") || base.starts_with("https://")) {
        issues.push("api.base_url must start with http:// or https://".into());
    } else if has_path(base) {
        issues.push("api.base_url must not include a path (requests use absolute /api/... paths)".into());
    }
    if config.api.user_agent.trim().is_empty() {
        issues.push("api.user_agent must not be empty".into());
    }

    if config.fetch.timeout_secs == 0 {
        issues.push("fetch.timeout_secs must be > 0".into());
    }
    if config.fetch.slow_timeout_secs == 0 {
        issues.push("fetch.slow_timeout_secs must be > 0".into());
    }
    if config.fetch.slow_timeout_secs < config.fetch.timeout_secs {
        issues.push("fetch.slow_timeout_secs must be >= fetch.timeout_secs".into());
    }

    if config.refresh.default_symbol.trim().is_empty() {
        issues.push("refresh.default_symbol must not be empty".into());
    }
    if config.refresh.history_days == 0 {
        issues.push("refresh.history_days must be > 0".into());
    }
    if config.refresh.auto_refresh_secs == 0 {
        issues.push("refresh.auto_refresh_secs must be > 0".into());
    }

    if !config.alerts.proximity_pct.is_finite() || config.alerts.proximity_pct < 0.0 {
        issues.push("alerts.proximity_pct must be >= 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply `COT_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut DashboardConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("COT_API_BASE_URL") {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(raw) = lookup("COT_CACHE_TTL_SECS") {
        config.fetch.cache_ttl_secs = parse_non_negative_u64(&raw, "COT_CACHE_TTL_SECS")?;
    }
    if let Some(raw) = lookup("COT_TIMEOUT_SECS") {
        config.fetch.timeout_secs = parse_positive_u64(&raw, "COT_TIMEOUT_SECS")?;
    }
    if let Some(raw) = lookup("COT_SLOW_TIMEOUT_SECS") {
        config.fetch.slow_timeout_secs = parse_positive_u64(&raw, "COT_SLOW_TIMEOUT_SECS")?;
    }
    if let Some(raw) = lookup("COT_COALESCE") {
        config.fetch.coalesce_in_flight = parse_bool(&raw);
    }
    if let Some(symbol) = lookup("COT_DEFAULT_SYMBOL") {
        config.refresh.default_symbol = symbol.trim().to_string();
    }
    if let Some(raw) = lookup("COT_HISTORY_DAYS") {
        let days = parse_positive_u64(&raw, "COT_HISTORY_DAYS")?;
        config.refresh.history_days = u32::try_from(days)
            .map_err(|_| Error::Config("COT_HISTORY_DAYS is out of range".into()))?;
    }
    if let Some(raw) = lookup("COT_AUTO_REFRESH_SECS") {
        config.refresh.auto_refresh_secs = parse_positive_u64(&raw, "COT_AUTO_REFRESH_SECS")?;
    }
    if let Some(raw) = lookup("COT_SETTLE_DELAY_MS") {
        config.refresh.settle_delay_ms = parse_non_negative_u64(&raw, "COT_SETTLE_DELAY_MS")?;
    }
    if let Some(raw) = lookup("COT_PROXIMITY_PCT") {
        config.alerts.proximity_pct = parse_non_negative_f64(&raw, "COT_PROXIMITY_PCT")?;
    }
    Ok(())
}

/// Load dashboard configuration from environment and optional config file.
pub fn load_config() -> Result<DashboardConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = DashboardConfig::default();

    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config)?;

    Ok(config)
}
