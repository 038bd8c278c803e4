// =============================================================================
// Relative Strength Index (RSI) — exponential smoothing, alpha = 1/period
// =============================================================================
//
// Close-to-close deltas are split into gains and losses, each smoothed with
// the recursive exponentially-weighted mean seeded by its first value:
//
//   avg[t] = alpha * value[t] + (1 - alpha) * avg[t-1],   alpha = 1 / period
//
// RSI = 100 - 100 / (1 + avg_gain / (avg_loss + EPSILON))
//
// EPSILON keeps the ratio finite when the loss average sits at zero. This is
// the smoothly converging variant; it must not be mixed with the SMA-seeded
// Wilder form, which warms up differently.
// =============================================================================

use super::EPSILON;

/// Compute the RSI series for `closes` with smoothing factor `1/period`.
///
/// The output carries one value per close-to-close delta
/// (`closes.len() - 1` values). Every value lies in `[0, 100]`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - fewer than two closes => empty vec (no deltas exist)
/// - a flat stretch with no gains and no losses reads as RSI 0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < 2 {
        return Vec::new();
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut seeded = false;

    let mut result = Vec::with_capacity(closes.len() - 1);

    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if seeded {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        } else {
            avg_gain = gain;
            avg_loss = loss;
            seeded = true;
        }

        let rs = avg_gain / (avg_loss + EPSILON);
        result.push(100.0 - 100.0 / (1.0 + rs));
    }

    result
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_single_close() {
        assert!(calculate_rsi(&[100.0], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_all_gains_near_hundred() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 29);
        for &v in &series {
            assert!(v > 99.0 && v <= 100.0, "expected ~100, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for &v in &series {
            assert!(v.abs() < 1e-9, "expected 0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), closes.len() - 1);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_monotonic_decline_trends_to_zero() {
        // Flat open, then a straight decline: the smoothed loss average
        // dominates and RSI must converge toward 0 without ever leaving range.
        let closes = vec![
            10.0, 10.0, 10.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0,
        ];
        let series = calculate_rsi(&closes, 5);
        assert_eq!(series.len(), 12);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
        let last = *series.last().unwrap();
        assert!(last < 1.0, "expected RSI near 0 after a straight decline, got {last}");
    }

    #[test]
    fn rsi_deterministic() {
        let closes = vec![10.0, 11.0, 10.5, 10.8, 11.2, 10.9, 11.5];
        assert_eq!(calculate_rsi(&closes, 5), calculate_rsi(&closes, 5));
    }
}
