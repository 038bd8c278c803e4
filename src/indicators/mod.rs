// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math plus the snapshot computation that
// feeds the signal evaluator. Everything is recomputed from the full candle
// window on every cycle; no incremental state is carried between cycles.

pub mod bollinger;
pub mod rsi;
pub mod stochastic;

use thiserror::Error;

use crate::market_data::CandleSeries;

/// Guard against division by zero in flat markets. Never surfaced to callers.
pub(crate) const EPSILON: f64 = 1e-12;

/// Per-indicator look-back parameters for one analysis cycle.
#[derive(Debug, Clone)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_mult: f64,
}

/// Indicator values for the most recent candle of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub bb_upper: f64,
    pub bb_mid: f64,
    pub bb_lower: f64,
    pub close: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("candle series is empty")]
    InsufficientData,
}

/// Compute the snapshot for the latest candle of `series`.
///
/// All indicators read the same full window; none truncates differently from
/// another. The only failure mode is an empty series. A series with a single
/// candle has no close-to-close delta, so RSI reads the neutral midpoint 50.
pub fn compute_snapshot(
    series: &CandleSeries,
    params: &IndicatorParams,
) -> Result<IndicatorSnapshot, IndicatorError> {
    let last = series.last().ok_or(IndicatorError::InsufficientData)?;
    let close = last.close;

    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();

    let rsi = rsi::calculate_rsi(&closes, params.rsi_period)
        .last()
        .copied()
        .unwrap_or(50.0);

    let (k_series, d_series) = stochastic::calculate_stochastic(
        &highs,
        &lows,
        &closes,
        params.stoch_k_period,
        params.stoch_d_period,
    );
    let stoch_k = k_series.last().copied().unwrap_or(50.0);
    let stoch_d = d_series.last().copied().unwrap_or(50.0);

    let bands = bollinger::calculate_bollinger(
        &closes,
        params.bollinger_period,
        params.bollinger_std_mult,
    )
    .unwrap_or(bollinger::BollingerBands {
        upper: close,
        mid: close,
        lower: close,
    });

    Ok(IndicatorSnapshot {
        rsi,
        stoch_k,
        stoch_d,
        bb_upper: bands.upper,
        bb_mid: bands.mid,
        bb_lower: bands.lower,
        close,
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Candle;

    fn params() -> IndicatorParams {
        IndicatorParams {
            rsi_period: 14,
            stoch_k_period: 14,
            stoch_d_period: 3,
            bollinger_period: 20,
            bollinger_std_mult: 2.0,
        }
    }

    fn series_from_closes(closes: &[f64]) -> CandleSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                epoch: i as i64 * 300,
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
            })
            .collect();
        CandleSeries::new(candles, closes.len()).unwrap()
    }

    #[test]
    fn empty_series_fails() {
        let series = CandleSeries::new(Vec::new(), 10).unwrap();
        assert_eq!(
            compute_snapshot(&series, &params()),
            Err(IndicatorError::InsufficientData)
        );
    }

    #[test]
    fn snapshot_invariants_hold() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 43.90, 44.50,
            44.80, 44.10, 43.70, 44.30,
        ];
        let series = series_from_closes(&closes);
        let snap = compute_snapshot(&series, &params()).unwrap();

        assert!((0.0..=100.0).contains(&snap.rsi));
        assert!((0.0..=100.0).contains(&snap.stoch_k));
        assert!((0.0..=100.0).contains(&snap.stoch_d));
        assert!(snap.bb_lower <= snap.bb_mid && snap.bb_mid <= snap.bb_upper);
        assert_eq!(snap.close, *closes.last().unwrap());
    }

    #[test]
    fn snapshot_is_idempotent() {
        let closes = vec![10.0, 11.0, 10.5, 10.8, 11.2, 10.9, 11.5, 11.3];
        let series = series_from_closes(&closes);
        let first = compute_snapshot(&series, &params()).unwrap();
        let second = compute_snapshot(&series, &params()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn short_series_still_defined() {
        // Two candles against 14/14/3/20 periods: shrinking windows apply.
        let series = series_from_closes(&[100.0, 101.0]);
        let snap = compute_snapshot(&series, &params()).unwrap();
        assert!(snap.rsi.is_finite());
        assert!(snap.stoch_k.is_finite());
        assert!(snap.stoch_d.is_finite());
        assert!(snap.bb_lower <= snap.bb_mid && snap.bb_mid <= snap.bb_upper);
    }

    #[test]
    fn single_candle_reads_neutral_rsi() {
        let series = series_from_closes(&[100.0]);
        let snap = compute_snapshot(&series, &params()).unwrap();
        assert_eq!(snap.rsi, 50.0);
        assert_eq!(snap.bb_mid, 100.0);
    }
}
