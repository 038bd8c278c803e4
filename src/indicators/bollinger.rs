// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band: rolling mean of close. Upper/lower: mean +/- k * sigma, where
// sigma is the rolling population standard deviation. The window shrinks near
// the start of the series; a single-sample window has sigma 0 and all three
// bands collapse onto the close.

/// Bands for the most recent candle of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
}

/// Calculate the bands over the newest `period` closes (fewer if the series
/// is shorter). Returns `None` when `closes` is empty or `period` is zero.
pub fn calculate_bollinger(closes: &[f64], period: usize, std_mult: f64) -> Option<BollingerBands> {
    if period == 0 || closes.is_empty() {
        return None;
    }

    let window = &closes[closes.len().saturating_sub(period)..];
    let n = window.len() as f64;

    let mid = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mid).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    Some(BollingerBands {
        upper: mid + std_mult * std_dev,
        mid,
        lower: mid - std_mult * std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(calculate_bollinger(&[], 20, 2.0).is_none());
    }

    #[test]
    fn zero_period() {
        assert!(calculate_bollinger(&[1.0, 2.0], 0, 2.0).is_none());
    }

    #[test]
    fn band_ordering() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.lower <= bb.mid && bb.mid <= bb.upper);
        assert!(bb.upper > bb.mid);
    }

    #[test]
    fn flat_window_collapses() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!((bb.upper - 100.0).abs() < 1e-10);
        assert!((bb.mid - 100.0).abs() < 1e-10);
        assert!((bb.lower - 100.0).abs() < 1e-10);
    }

    #[test]
    fn single_sample_has_zero_std() {
        let bb = calculate_bollinger(&[42.0], 20, 2.0).unwrap();
        assert_eq!(bb.upper, 42.0);
        assert_eq!(bb.mid, 42.0);
        assert_eq!(bb.lower, 42.0);
    }

    #[test]
    fn shrinking_window_uses_all_available() {
        // 3 closes against a 20-period request: mean of all three.
        let bb = calculate_bollinger(&[10.0, 20.0, 30.0], 20, 2.0).unwrap();
        assert!((bb.mid - 20.0).abs() < 1e-10);
        // Population std of [10, 20, 30] is sqrt(200/3).
        let expected_std = (200.0_f64 / 3.0).sqrt();
        assert!((bb.upper - (20.0 + 2.0 * expected_std)).abs() < 1e-9);
    }

    #[test]
    fn only_tail_window_contributes() {
        // A wild outlier outside the window must not move the bands.
        let mut closes = vec![1_000_000.0];
        closes.extend(vec![100.0; 20]);
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!((bb.mid - 100.0).abs() < 1e-10);
    }
}
