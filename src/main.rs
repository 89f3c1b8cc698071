//! cot-dashboard: command-line client for the COT Analysis Platform.
//!
//! Every command goes through the cached fetcher, so repeated panels within
//! the cache window cost no extra requests and a backend outage degrades to
//! the last good data instead of an empty screen.

mod config;

use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use common::{DashboardConfig, Error};
use cot_client::{DashboardContext, DashboardSnapshot, Panel};

/// COT Analysis Platform dashboard client
#[derive(Parser)]
#[command(name = "cot-dashboard", about = "COT Analysis Platform dashboard client")]
struct Cli {
    /// Symbol to load (defaults to refresh.default_symbol).
    #[arg(long, global = true)]
    symbol: Option<String>,

    /// COT history window in days (defaults to refresh.history_days).
    #[arg(long, global = true)]
    days: Option<u32>,

    /// Skip the response cache and ask the backend for fresh data.
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available symbols.
    Symbols,
    /// Complete analysis, latest COT row and net change.
    Overview,
    /// COT history for the selected window.
    History,
    /// Technical levels and signal.
    Technical,
    /// Recent model predictions.
    Predictions,
    /// Economic indicators, Fed watch and the event calendar.
    Economic,
    /// Backend component status.
    Status,
    /// Support/resistance proximity alerts.
    Alerts,
    /// Run a fresh scrape and analysis, then reload.
    Analyze,
    /// Reload every panel on the auto-refresh interval until Ctrl+C.
    Watch,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn log_snapshot(snapshot: &DashboardSnapshot) {
    let panels = [
        ("overview", snapshot.overview.is_ready()),
        ("history", snapshot.history.is_ready()),
        ("technical", snapshot.technical.is_ready()),
        ("economic", snapshot.economic.is_ready()),
        ("calendar", snapshot.calendar.is_ready()),
        ("status", snapshot.status.is_ready()),
    ];
    let failed: Vec<&str> = panels
        .iter()
        .filter(|(_, ready)| !ready)
        .map(|(name, _)| *name)
        .collect();

    if failed.is_empty() {
        info!("{}: all panels loaded", snapshot.symbol);
    } else {
        warn!("{}: failed panels {:?}", snapshot.symbol, failed);
    }
    if let Panel::Ready(alerts) = &snapshot.alerts {
        for alert in alerts {
            warn!("{} {:?} ({:.2}%)", snapshot.symbol, alert.kind, alert.distance_pct);
        }
    }
}

async fn watch(ctx: &DashboardContext, every: Duration, bypass_cache: bool) -> Result<(), Error> {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut first = true;

    info!(
        "Watching {} every {}s. Press Ctrl+C to stop.",
        ctx.current_symbol(),
        every.as_secs()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
            _ = interval.tick() => {
                // Only the first pass honours --refresh; later ticks rely on the cache TTL.
                let snapshot = ctx.load_all(bypass_cache && first).await;
                first = false;
                log_snapshot(&snapshot);
                print_json(&snapshot)?;
            }
        }
    }
}

async fn run(cli: Cli, cfg: &DashboardConfig) -> Result<(), Error> {
    let mut ctx = DashboardContext::from_config(cfg)?;
    if let Some(days) = cli.days {
        ctx.set_days(days);
    }
    if let Some(symbol) = cli.symbol.as_deref() {
        ctx.set_symbol(symbol);
    }
    let bypass = cli.refresh;
    let symbol = ctx.current_symbol().to_string();

    match cli.command {
        Command::Symbols => print_json(&ctx.symbols(bypass).await?),
        Command::Overview => print_json(&ctx.load_overview(&symbol, bypass).await?),
        Command::History => print_json(
            &ctx.api()
                .cot_history(&symbol, ctx.selected_days(), bypass)
                .await?,
        ),
        Command::Technical => print_json(&ctx.api().technical(&symbol, bypass).await?),
        Command::Predictions => print_json(&ctx.api().predictions(&symbol, bypass).await?),
        Command::Economic => {
            let (current, calendar) = tokio::join!(
                ctx.api().economic_current(bypass),
                ctx.api().economic_calendar(bypass),
            );
            print_json(&json!({
                "current": Panel::from(current),
                "calendar": Panel::from(calendar),
            }))
        }
        Command::Status => print_json(&ctx.api().system_status(bypass).await?),
        Command::Alerts => print_json(&ctx.alerts(bypass).await?),
        Command::Analyze => {
            let (scrape, report) = ctx.run_full_analysis().await?;
            print_json(&json!({ "scrape": scrape, "reload": report }))
        }
        Command::Watch => {
            watch(&ctx, Duration::from_secs(cfg.refresh.auto_refresh_secs), bypass).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cot_dashboard=info,cot_client=info,normalize=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Backend: {}", cfg.api.base_url);
    info!(
        "Cache: ttl={}s, timeout={}s, slow_timeout={}s, coalesce={}",
        cfg.fetch.cache_ttl_secs,
        cfg.fetch.timeout_secs,
        cfg.fetch.slow_timeout_secs,
        cfg.fetch.coalesce_in_flight,
    );

    if let Err(e) = run(cli, &cfg).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
