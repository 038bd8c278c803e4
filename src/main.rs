// =============================================================================
// Meridian — candle-driven signal notifier. Main entry point.
// =============================================================================
//
// Startup order: environment, logging, config validation (the only fatal
// error path), startup announcement, then the fixed-interval cycle loop.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod deriv;
mod indicators;
mod market_data;
mod notifier;
mod runtime_config;
mod signals;
mod strategy;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::notifier::format_startup;
use crate::runtime_config::RuntimeConfig;
use crate::strategy::SignalEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::from_env()?;
    config.validate()?;

    info!(
        symbols = ?config.symbols,
        timeframe_s = config.timeframe_seconds,
        candles = config.candle_count,
        "meridian signal engine starting"
    );

    // ── 2. Build the engine ──────────────────────────────────────────────
    let engine = Arc::new(SignalEngine::new(config.clone()));

    // One informational message so the channel knows the engine is up.
    if let Err(e) = engine
        .notifier()
        .send(&format_startup(&config.symbols, config.timeframe_seconds))
        .await
    {
        warn!(error = %e, "startup announcement failed");
    }

    // ── 3. Cycle loop ────────────────────────────────────────────────────
    // One tick per candle interval. Delayed ticks are not allowed to stack,
    // so cycles never overlap even when a cycle outruns the interval.
    let cycle_engine = engine.clone();
    let tick = Duration::from_secs(config.timeframe_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            cycle_engine.run_cycle().await;
        }
    });

    info!("cycle loop running. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("shutdown signal received - stopping");

    Ok(())
}
