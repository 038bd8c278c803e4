// =============================================================================
// Signal Engine — per-instrument analysis cycle
// =============================================================================
//
// Pipeline per instrument:
//   1. Fetch the newest candle window from Deriv
//   2. Gate on minimum history (longest look-back + 1)
//   3. Compute the indicator snapshot
//   4. Evaluate thresholds into a verdict
//   5. Deduplicate against the last emitted verdict
//   6. On change: format, notify, record
//
// Instruments are evaluated strictly one after another within a cycle. Every
// per-instrument failure stops at the instrument boundary; the cycle always
// continues to the next symbol.
// =============================================================================

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::deriv::{DerivClient, FetchError};
use crate::indicators;
use crate::notifier::{format_signal, TelegramNotifier};
use crate::runtime_config::RuntimeConfig;
use crate::signals::{evaluate, SignalStateStore};
use crate::types::Verdict;

/// What happened to one instrument in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not enough closed candles this cycle.
    Skipped,
    /// Verdict computed; unchanged or NONE, so no notification.
    Unchanged(Verdict),
    /// Verdict change delivered (or delivery attempted) and recorded.
    Notified(Verdict),
}

/// Owns the provider client, the notifier, and the per-instrument signal
/// state for the lifetime of the process.
pub struct SignalEngine {
    client: DerivClient,
    notifier: TelegramNotifier,
    store: SignalStateStore,
    config: RuntimeConfig,
}

impl SignalEngine {
    pub fn new(config: RuntimeConfig) -> Self {
        let client = DerivClient::new(&config.deriv_ws_url, &config.deriv_app_id);
        let notifier = TelegramNotifier::new(&config.telegram_bot_token, &config.telegram_chat_id);

        Self {
            client,
            notifier,
            store: SignalStateStore::new(),
            config,
        }
    }

    pub fn notifier(&self) -> &TelegramNotifier {
        &self.notifier
    }

    /// Run one full cycle over all configured instruments.
    pub async fn run_cycle(&self) {
        for symbol in &self.config.symbols {
            match self.analyze_symbol(symbol).await {
                Ok(Outcome::Skipped) => {}
                Ok(Outcome::Unchanged(verdict)) => {
                    debug!(symbol = %symbol, verdict = %verdict, "no notification required");
                }
                Ok(Outcome::Notified(verdict)) => {
                    info!(symbol = %symbol, verdict = %verdict, "signal notified");
                }
                Err(FetchError::DataUnavailable(reason)) => {
                    info!(symbol = %symbol, reason = %reason, "no usable data this cycle");
                }
                Err(FetchError::Transport(e)) => {
                    warn!(symbol = %symbol, error = %e, "fetch failed - skipping instrument");
                }
            }
        }
    }

    /// Analyse a single instrument: fetch, snapshot, evaluate, deduplicate,
    /// notify on change.
    async fn analyze_symbol(&self, symbol: &str) -> Result<Outcome, FetchError> {
        let series = self
            .client
            .fetch_candles(
                symbol,
                self.config.candle_count,
                self.config.timeframe_seconds as u32,
            )
            .await?;

        let min_candles = self.config.min_candles();
        if series.len() < min_candles {
            info!(
                symbol = %symbol,
                have = series.len(),
                need = min_candles,
                "not enough data"
            );
            return Ok(Outcome::Skipped);
        }

        let snapshot = match indicators::compute_snapshot(&series, &self.config.indicator_params())
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "snapshot computation failed");
                return Ok(Outcome::Skipped);
            }
        };

        let verdict = evaluate(&snapshot, &self.config.thresholds());

        if !self.store.should_notify(symbol, &verdict) {
            let active_since = self.store.last(symbol).map(|r| r.emitted_at.to_rfc3339());
            debug!(
                symbol = %symbol,
                verdict = %verdict,
                active_since = active_since.as_deref().unwrap_or("never"),
                rsi = snapshot.rsi,
                stoch_k = snapshot.stoch_k,
                stoch_d = snapshot.stoch_d,
                close = snapshot.close,
                "same or empty signal"
            );
            return Ok(Outcome::Unchanged(verdict));
        }

        let now = Utc::now();
        let message = format_signal(symbol, &verdict, &snapshot, now);

        // Delivery failure still records: the verdict is not retried on the
        // next cycle against an unchanged market.
        if let Err(e) = self.notifier.send(&message).await {
            warn!(symbol = %symbol, error = %e, "telegram delivery failed");
        }
        self.store.record(symbol, &verdict, now);

        info!(
            symbol = %symbol,
            verdict = %verdict,
            reason = verdict.reason().unwrap_or(""),
            "sent"
        );

        Ok(Outcome::Notified(verdict))
    }
}
