//! Dashboard client configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Backend location and identification.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cache and timeout policy for the cached fetcher.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Reload and auto-refresh behaviour.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Price proximity alerts.
    #[serde(default)]
    pub alerts: AlertConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host (optionally port) of the backend. Request paths are
    /// absolute (`/api/...`), so any path on this URL would be replaced.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Cached fetcher policy.
///
/// The dashboard revisions disagreed on these values (30s vs 300s TTL,
/// 10s vs 30s timeout), so none of them is treated as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Freshness window for cached responses.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Request timeout for ordinary endpoints.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Request timeout for expensive endpoints (complete analysis, scrape).
    #[serde(default = "default_slow_timeout")]
    pub slow_timeout_secs: u64,

    /// Serve concurrent requests for the same URL with one network call.
    #[serde(default = "default_true")]
    pub coalesce_in_flight: bool,
}

/// Reload behaviour for the dashboard context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Symbol selected on start-up.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    /// COT history window in days.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Auto-refresh interval for `watch`.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh_secs: u64,

    /// Pause between a scrape and the forced reload, so the backend can
    /// persist results and drop its own cache.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

/// Alert thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Distance to support/resistance (percent) at or below which an alert fires.
    #[serde(default = "default_proximity_pct")]
    pub proximity_pct: f64,
}

impl FetchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn slow_timeout(&self) -> Duration {
        Duration::from_secs(self.slow_timeout_secs)
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_user_agent() -> String {
    "cot-dashboard/0.1".into()
}

fn default_cache_ttl() -> u64 {
    30
}
fn default_timeout() -> u64 {
    30
}
fn default_slow_timeout() -> u64 {
    30
}

fn default_symbol() -> String {
    "GOLD".into()
}
fn default_history_days() -> u32 {
    90
}
fn default_auto_refresh() -> u64 {
    300
}
fn default_settle_delay() -> u64 {
    2000
}

fn default_proximity_pct() -> f64 {
    0.5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: default_timeout(),
            slow_timeout_secs: default_slow_timeout(),
            coalesce_in_flight: default_true(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            default_symbol: default_symbol(),
            history_days: default_history_days(),
            auto_refresh_secs: default_auto_refresh(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            proximity_pct: default_proximity_pct(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            fetch: FetchConfig::default(),
            refresh: RefreshConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}
