// =============================================================================
// Market data model — candles and candle series
// =============================================================================

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A single OHLC candle. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time, unix seconds.
    pub epoch: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Ordered OHLC history for one instrument.
///
/// Timestamps are strictly increasing; the series keeps at most the newest
/// `capacity` candles. Owned exclusively by the analysis cycle that fetched
/// it and never mutated after construction.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series from provider candles, oldest first.
    ///
    /// Fails when any timestamp is not strictly greater than its predecessor.
    /// When more than `capacity` candles are supplied, only the newest
    /// `capacity` are retained.
    pub fn new(mut candles: Vec<Candle>, capacity: usize) -> Result<Self> {
        for pair in candles.windows(2) {
            if pair[1].epoch <= pair[0].epoch {
                bail!(
                    "candle timestamps not strictly increasing: {} then {}",
                    pair[0].epoch,
                    pair[1].epoch
                );
            }
        }

        if candles.len() > capacity {
            candles.drain(..candles.len() - capacity);
        }

        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle, if any.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }
}
