// =============================================================================
// Deriv ticks_history client — ephemeral WebSocket candle fetch
// =============================================================================
//
// One short-lived connection per request: connect, send the ticks_history
// payload, read the single JSON response, close. Connect and read are each
// bounded by REQUEST_TIMEOUT so a stalled endpoint costs one instrument one
// cycle, never the whole process.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

use crate::market_data::{Candle, CandleSeries};

/// Bound applied to the connect and to the single response read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum FetchError {
    /// Provider returned no candles, malformed candles, or an API error.
    /// Informational: the instrument is skipped for the cycle.
    #[error("no candle data available: {0}")]
    DataUnavailable(String),

    /// Socket, TLS, or timeout failure.
    #[error("transport failure: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Client for the Deriv `ticks_history` candle endpoint.
#[derive(Debug, Clone)]
pub struct DerivClient {
    ws_url: String,
    app_id: String,
}

impl DerivClient {
    /// Create a client for `ws_url`, with an optional (possibly empty)
    /// application id appended as a query parameter.
    pub fn new(ws_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            app_id: app_id.into(),
        }
    }

    /// Full endpoint URL including the app_id query parameter when set.
    fn endpoint(&self) -> String {
        if self.app_id.is_empty() {
            self.ws_url.clone()
        } else if self.ws_url.contains('?') {
            format!("{}&app_id={}", self.ws_url, self.app_id)
        } else {
            format!("{}?app_id={}", self.ws_url, self.app_id)
        }
    }

    /// Fetch the newest `count` candles for `symbol` at `granularity` seconds.
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        count: u32,
        granularity: u32,
    ) -> Result<CandleSeries, FetchError> {
        let url = self.endpoint();
        let request = json!({
            "ticks_history": symbol,
            "style": "candles",
            "granularity": granularity,
            "count": count,
            "end": "latest",
            "subscribe": 0,
        });

        let (mut ws, _response) = timeout(REQUEST_TIMEOUT, connect_async(&url))
            .await
            .map_err(|_| anyhow!("connect timed out after {REQUEST_TIMEOUT:?}"))?
            .context("failed to connect to ticks_history WebSocket")?;

        debug!(symbol, count, granularity, "ticks_history request");

        ws.send(Message::Text(request.to_string()))
            .await
            .context("failed to send ticks_history request")?;

        let raw = loop {
            let frame = match timeout(REQUEST_TIMEOUT, ws.next()).await {
                Err(_) => {
                    return Err(FetchError::Transport(anyhow!(
                        "response read timed out after {REQUEST_TIMEOUT:?}"
                    )))
                }
                Ok(None) => {
                    return Err(FetchError::Transport(anyhow!(
                        "WebSocket closed before a response arrived"
                    )))
                }
                Ok(Some(frame)) => frame.context("ticks_history read failed")?,
            };

            match frame {
                Message::Text(text) => break text,
                // Ping/pong replies are handled by tungstenite; skip other frames.
                _ => continue,
            }
        };

        let _ = ws.close(None).await;

        parse_candles_response(&raw, count as usize)
    }
}

/// Parse a ticks_history response body into a CandleSeries.
fn parse_candles_response(raw: &str, capacity: usize) -> Result<CandleSeries, FetchError> {
    let root: Value = serde_json::from_str(raw)
        .context("failed to parse ticks_history JSON")
        .map_err(FetchError::Transport)?;

    if let Some(err) = root.get("error") {
        let message = err["message"].as_str().unwrap_or("unknown provider error");
        return Err(FetchError::DataUnavailable(format!(
            "provider error: {message}"
        )));
    }

    // Candles arrive at the top level or under "history" depending on the
    // endpoint variant; accept both.
    let entries = root["candles"]
        .as_array()
        .or_else(|| root["history"]["candles"].as_array())
        .ok_or_else(|| FetchError::DataUnavailable("response carries no candle list".into()))?;

    if entries.is_empty() {
        return Err(FetchError::DataUnavailable("empty candle list".into()));
    }

    let mut candles = Vec::with_capacity(entries.len());
    for entry in entries {
        let epoch = entry["epoch"]
            .as_i64()
            .ok_or_else(|| FetchError::DataUnavailable("candle missing epoch".into()))?;

        candles.push(Candle {
            epoch,
            open: parse_price(&entry["open"], "open")?,
            high: parse_price(&entry["high"], "high")?,
            low: parse_price(&entry["low"], "low")?,
            close: parse_price(&entry["close"], "close")?,
        });
    }

    CandleSeries::new(candles, capacity).map_err(|e| FetchError::DataUnavailable(e.to_string()))
}

/// Deriv sends price fields as JSON numbers or strings; accept both.
fn parse_price(val: &Value, field: &str) -> Result<f64, FetchError> {
    if let Some(n) = val.as_f64() {
        Ok(n)
    } else if let Some(s) = val.as_str() {
        s.parse::<f64>().map_err(|_| {
            FetchError::DataUnavailable(format!("candle field {field} is not numeric: {s}"))
        })
    } else {
        Err(FetchError::DataUnavailable(format!(
            "candle field {field} missing"
        )))
    }
}
