// =============================================================================
// Signal evaluator — threshold rules over an indicator snapshot
// =============================================================================
//
// Decision rule, first match wins:
//   SELL  (stoch %K or %D >= stoch_overbought) AND rsi >= rsi_overbought
//         AND close >= bb_upper
//   BUY   (stoch %K or %D <= stoch_oversold) AND rsi <= rsi_oversold
//         AND close <= bb_lower
//   NONE  otherwise
//
// The stochastic condition is a threshold touch on either line independently,
// not a %K/%D crossover. Low-confirmation on purpose; it can flip quickly on
// noisy data.

use crate::indicators::IndicatorSnapshot;
use crate::types::Verdict;

/// Overbought/oversold thresholds applied to every snapshot.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub stoch_overbought: f64,
    pub stoch_oversold: f64,
}

/// Convert a snapshot into a verdict. Pure; identical snapshots always yield
/// identical verdicts.
pub fn evaluate(snapshot: &IndicatorSnapshot, thresholds: &Thresholds) -> Verdict {
    let touch_overbought = snapshot.stoch_k >= thresholds.stoch_overbought
        || snapshot.stoch_d >= thresholds.stoch_overbought;
    let touch_oversold = snapshot.stoch_k <= thresholds.stoch_oversold
        || snapshot.stoch_d <= thresholds.stoch_oversold;

    if touch_overbought
        && snapshot.rsi >= thresholds.rsi_overbought
        && snapshot.close >= snapshot.bb_upper
    {
        Verdict::Sell {
            reason: format!(
                "Stoch_touch(OB) + RSI {:.2} >= {} + close >= upper_BB",
                snapshot.rsi, thresholds.rsi_overbought
            ),
        }
    } else if touch_oversold
        && snapshot.rsi <= thresholds.rsi_oversold
        && snapshot.close <= snapshot.bb_lower
    {
        Verdict::Buy {
            reason: format!(
                "Stoch_touch(OS) + RSI {:.2} <= {} + close <= lower_BB",
                snapshot.rsi, thresholds.rsi_oversold
            ),
        }
    } else {
        Verdict::None
    }
}
