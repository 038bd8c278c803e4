// =============================================================================
// Signals Module
// =============================================================================
//
// Threshold evaluation of indicator snapshots plus the per-instrument state
// that suppresses repeat notifications.

pub mod evaluator;
pub mod state;

pub use evaluator::{evaluate, Thresholds};
pub use state::SignalStateStore;
