// =============================================================================
// Shared types used across the Meridian signal engine
// =============================================================================

use chrono::{DateTime, Utc};

/// Direction carried by an actionable verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Discrete outcome of evaluating one instrument in one cycle.
///
/// `Buy` and `Sell` carry a human-readable justification naming the conditions
/// that fired. Two verdicts count as the same signal on direction alone; the
/// justification text is not part of that identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Buy { reason: String },
    Sell { reason: String },
    None,
}

impl Verdict {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Buy { .. } => Some(Direction::Buy),
            Self::Sell { .. } => Some(Direction::Sell),
            Self::None => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Buy { reason } | Self::Sell { reason } => Some(reason),
            Self::None => None,
        }
    }

    /// BUY and SELL are actionable; NONE is not.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Same direction, justification ignored.
    pub fn same_signal(&self, other: &Verdict) -> bool {
        self.direction() == other.direction()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy { .. } => write!(f, "BUY"),
            Self::Sell { .. } => write!(f, "SELL"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Last verdict emitted for one instrument. Created on the first actionable
/// verdict, overwritten on every change, lives for the process lifetime.
#[derive(Debug, Clone)]
pub struct SignalRecord {
    pub instrument: String,
    pub verdict: Verdict,
    pub emitted_at: DateTime<Utc>,
}
