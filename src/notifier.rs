// =============================================================================
// Telegram notifier + message formatting
// =============================================================================
//
// Delivery is fire-and-forget from the pipeline's perspective: a failed send
// is logged and the cycle moves on. Message rendering is a pure function so
// it can be tested without a network.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::indicators::IndicatorSnapshot;
use crate::types::Verdict;

/// Bound on the sendMessage HTTP request.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Request failed, timed out, or Telegram returned a non-2xx status.
    #[error("telegram delivery failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Telegram Bot API client. With empty credentials every send becomes a
/// logged no-op, so the engine runs fine without a configured channel.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }

    /// Deliver `text` as a Markdown message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        if !self.is_configured() {
            warn!("telegram token/chat not set - skipping send");
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("sendMessage request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Transport(anyhow!(
                "telegram returned {status}: {body}"
            )));
        }

        debug!("telegram message delivered");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

// =============================================================================
// Message formatting
// =============================================================================

/// Render a verdict and its snapshot into the notification body. Pure.
pub fn format_signal(
    instrument: &str,
    verdict: &Verdict,
    snapshot: &IndicatorSnapshot,
    at: DateTime<Utc>,
) -> String {
    format!(
        "\u{1F4CA} *Meridian Signal*\n\
         *Symbol:* `{instrument}`\n\
         *Signal:* *{verdict}*\n\
         *Time (UTC):* `{}`\n\
         *Reason:* {}\n\n\
         *Indicators:*\n\
         \u{2022} RSI: `{:.2}`\n\
         \u{2022} Stoch K/D: `{:.2}` / `{:.2}`\n\
         \u{2022} Close: `{:.5}`\n\
         \u{2022} BB Upper: `{:.5}`  BB Lower: `{:.5}`",
        at.format("%Y-%m-%d %H:%M:%S"),
        verdict.reason().unwrap_or("n/a"),
        snapshot.rsi,
        snapshot.stoch_k,
        snapshot.stoch_d,
        snapshot.close,
        snapshot.bb_upper,
        snapshot.bb_lower,
    )
}

/// One-line startup announcement for the channel.
pub fn format_startup(symbols: &[String], timeframe_seconds: u64) -> String {
    format!(
        "\u{1F680} Meridian signal engine is running ({} instruments, {}s candles).",
        symbols.len(),
        timeframe_seconds
    )
}
