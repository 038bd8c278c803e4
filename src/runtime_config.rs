// =============================================================================
// Runtime Configuration — environment-driven engine settings
// =============================================================================
//
// Every option has a default, so the engine starts with no environment at
// all. `validate()` runs once at startup, before the cycle loop, and is the
// only fatal error path in the process.
//
// =============================================================================

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::indicators::IndicatorParams;
use crate::signals::Thresholds;

// =============================================================================
// Default-value helpers (one per environment variable)
// =============================================================================

fn default_ws_url() -> String {
    "wss://ws.binaryws.com/websockets/v3".to_string()
}

fn default_symbols() -> Vec<String> {
    vec![
        "R_50".to_string(),
        "R_75".to_string(),
        "R_100".to_string(),
        "R_25".to_string(),
    ]
}

const DEFAULT_TIMEFRAME_SECONDS: u64 = 300;
const DEFAULT_CANDLE_COUNT: u32 = 200;
const DEFAULT_RSI_PERIOD: usize = 14;
const DEFAULT_STOCH_K_PERIOD: usize = 14;
const DEFAULT_STOCH_D_PERIOD: usize = 3;
const DEFAULT_BOLL_PERIOD: usize = 20;
const DEFAULT_BOLL_STD: f64 = 2.0;
const DEFAULT_RSI_OVERBOUGHT: f64 = 74.0;
const DEFAULT_RSI_OVERSOLD: f64 = 26.0;
const DEFAULT_STOCH_OVERBOUGHT: f64 = 92.5;
const DEFAULT_STOCH_OVERSOLD: f64 = 7.5;

// =============================================================================
// Errors
// =============================================================================

/// Invalid configuration. Fatal at startup, never later.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0}")]
    Constraint(String),
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Engine settings resolved from the process environment.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub deriv_ws_url: String,
    pub deriv_app_id: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    pub symbols: Vec<String>,
    pub timeframe_seconds: u64,
    pub candle_count: u32,

    pub rsi_period: usize,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_mult: f64,

    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub stoch_overbought: f64,
    pub stoch_oversold: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            deriv_ws_url: default_ws_url(),
            deriv_app_id: String::new(),
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            symbols: default_symbols(),
            timeframe_seconds: DEFAULT_TIMEFRAME_SECONDS,
            candle_count: DEFAULT_CANDLE_COUNT,
            rsi_period: DEFAULT_RSI_PERIOD,
            stoch_k_period: DEFAULT_STOCH_K_PERIOD,
            stoch_d_period: DEFAULT_STOCH_D_PERIOD,
            bollinger_period: DEFAULT_BOLL_PERIOD,
            bollinger_std_mult: DEFAULT_BOLL_STD,
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            stoch_overbought: DEFAULT_STOCH_OVERBOUGHT,
            stoch_oversold: DEFAULT_STOCH_OVERSOLD,
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the process environment, falling back to the
    /// defaults for anything unset. A set-but-unparsable value is an error,
    /// not a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            deriv_ws_url: env::var("DERIV_WS_URL").unwrap_or(defaults.deriv_ws_url),
            deriv_app_id: env::var("DERIV_APP_ID").unwrap_or_default(),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
            symbols: match env::var("SYMBOLS") {
                Ok(raw) => parse_symbols(&raw),
                Err(_) => defaults.symbols,
            },
            timeframe_seconds: env_parse("TIMEFRAME", defaults.timeframe_seconds)?,
            candle_count: env_parse("CANDLE_COUNT", defaults.candle_count)?,
            rsi_period: env_parse("RSI_PERIOD", defaults.rsi_period)?,
            stoch_k_period: env_parse("STOCH_K_PERIOD", defaults.stoch_k_period)?,
            stoch_d_period: env_parse("STOCH_D_PERIOD", defaults.stoch_d_period)?,
            bollinger_period: env_parse("BOLL_PERIOD", defaults.bollinger_period)?,
            bollinger_std_mult: env_parse("BOLL_STD", defaults.bollinger_std_mult)?,
            rsi_overbought: env_parse("RSI_OVERBOUGHT", defaults.rsi_overbought)?,
            rsi_oversold: env_parse("RSI_OVERSOLD", defaults.rsi_oversold)?,
            stoch_overbought: env_parse("STOCH_OVERBOUGHT", defaults.stoch_overbought)?,
            stoch_oversold: env_parse("STOCH_OVERSOLD", defaults.stoch_oversold)?,
        })
    }

    /// Fail-fast startup validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn require(ok: bool, msg: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Constraint(msg.to_string()))
            }
        }

        require(self.timeframe_seconds > 0, "TIMEFRAME must be positive")?;
        require(self.candle_count > 0, "CANDLE_COUNT must be positive")?;
        require(self.rsi_period > 0, "RSI_PERIOD must be positive")?;
        require(self.stoch_k_period > 0, "STOCH_K_PERIOD must be positive")?;
        require(self.stoch_d_period > 0, "STOCH_D_PERIOD must be positive")?;
        require(self.bollinger_period > 0, "BOLL_PERIOD must be positive")?;
        require(
            self.bollinger_std_mult.is_finite() && self.bollinger_std_mult > 0.0,
            "BOLL_STD must be finite and positive",
        )?;
        require(
            self.rsi_oversold < self.rsi_overbought,
            "RSI_OVERSOLD must be below RSI_OVERBOUGHT",
        )?;
        require(
            self.stoch_oversold < self.stoch_overbought,
            "STOCH_OVERSOLD must be below STOCH_OVERBOUGHT",
        )?;
        require(!self.symbols.is_empty(), "SYMBOLS must name at least one instrument")?;
        require(
            self.candle_count as usize >= self.min_candles(),
            "CANDLE_COUNT must cover the longest indicator period plus one",
        )?;

        Ok(())
    }

    /// Minimum closed candles required before an instrument is analysed.
    pub fn min_candles(&self) -> usize {
        self.bollinger_period
            .max(self.rsi_period)
            .max(self.stoch_k_period)
            + 1
    }

    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            rsi_period: self.rsi_period,
            stoch_k_period: self.stoch_k_period,
            stoch_d_period: self.stoch_d_period,
            bollinger_period: self.bollinger_period,
            bollinger_std_mult: self.bollinger_std_mult,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            rsi_overbought: self.rsi_overbought,
            rsi_oversold: self.rsi_oversold,
            stoch_overbought: self.stoch_overbought,
            stoch_oversold: self.stoch_oversold,
        }
    }
}

/// Comma-separated symbol list; blanks are dropped, whitespace trimmed.
fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse an environment variable, using `default` when unset.
fn env_parse<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.deriv_ws_url, "wss://ws.binaryws.com/websockets/v3");
        assert_eq!(cfg.symbols, vec!["R_50", "R_75", "R_100", "R_25"]);
        assert_eq!(cfg.timeframe_seconds, 300);
        assert_eq!(cfg.candle_count, 200);
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!(cfg.stoch_k_period, 14);
        assert_eq!(cfg.stoch_d_period, 3);
        assert_eq!(cfg.bollinger_period, 20);
        assert!((cfg.bollinger_std_mult - 2.0).abs() < f64::EPSILON);
        assert!((cfg.rsi_overbought - 74.0).abs() < f64::EPSILON);
        assert!((cfg.rsi_oversold - 26.0).abs() < f64::EPSILON);
        assert!((cfg.stoch_overbought - 92.5).abs() < f64::EPSILON);
        assert!((cfg.stoch_oversold - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn default_config_validates() {
        assert!(RuntimeConfig::default().validate().is_ok());
    }

    #[test]
    fn min_candles_covers_longest_period() {
        let cfg = RuntimeConfig::default();
        // max(20, 14, 14) + 1
        assert_eq!(cfg.min_candles(), 21);
    }

    #[test]
    fn zero_period_rejected() {
        let cfg = RuntimeConfig {
            rsi_period: 0,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_timeframe_rejected() {
        let cfg = RuntimeConfig {
            timeframe_seconds: 0,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_rsi_thresholds_rejected() {
        let cfg = RuntimeConfig {
            rsi_overbought: 26.0,
            rsi_oversold: 74.0,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_std_mult_rejected() {
        let cfg = RuntimeConfig {
            bollinger_std_mult: f64::NAN,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_symbol_list_rejected() {
        let cfg = RuntimeConfig {
            symbols: Vec::new(),
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn candle_count_below_lookback_rejected() {
        let cfg = RuntimeConfig {
            candle_count: 10,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn symbol_list_parsing_trims_and_drops_blanks() {
        assert_eq!(
            parse_symbols(" R_50 , R_75 ,, R_100 "),
            vec!["R_50", "R_75", "R_100"]
        );
        assert!(parse_symbols("  ,  ,").is_empty());
    }
}
