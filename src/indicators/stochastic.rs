// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// %K measures where the close sits inside the recent high/low range:
//
//   %K = 100 * (close - min(low, last k)) / (max(high, last k) - min(low, last k) + EPSILON)
//
// %D is the simple moving average of %K over `d_period` candles. Both windows
// shrink near the start of the series so every candle has a defined value.
// =============================================================================

use super::EPSILON;

/// Compute the %K and %D series over parallel `highs`/`lows`/`closes` slices.
///
/// Returns one (%K, %D) pair per input candle. Windows shorter than
/// `k_period` / `d_period` use whatever candles exist instead of producing
/// undefined values.
///
/// Empty vecs when either period is zero or the slices are empty or of
/// unequal length.
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = closes.len();
    if k_period == 0 || d_period == 0 || n == 0 || highs.len() != n || lows.len() != n {
        return (Vec::new(), Vec::new());
    }

    let mut k_series = Vec::with_capacity(n);
    for i in 0..n {
        let start = i.saturating_sub(k_period - 1);

        let mut low_min = f64::INFINITY;
        let mut high_max = f64::NEG_INFINITY;
        for j in start..=i {
            low_min = low_min.min(lows[j]);
            high_max = high_max.max(highs[j]);
        }

        let k = 100.0 * (closes[i] - low_min) / (high_max - low_min + EPSILON);
        k_series.push(k);
    }

    let mut d_series = Vec::with_capacity(n);
    for i in 0..n {
        let start = i.saturating_sub(d_period - 1);
        let window = &k_series[start..=i];
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        d_series.push(mean);
    }

    (k_series, d_series)
}
