// =============================================================================
// Signal state store — per-instrument last-emitted verdict
// =============================================================================
//
// In-memory only; resets on process restart. Per instrument the state machine
// is Unset -> Active(BUY) / Active(SELL); NONE verdicts never create or alter
// a record, so BUY -> NONE -> BUY is a single notification.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::types::{SignalRecord, Verdict};

/// Process-wide map from instrument to the last emitted verdict.
#[derive(Default)]
pub struct SignalStateStore {
    records: RwLock<HashMap<String, SignalRecord>>,
}

impl SignalStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last emitted verdict for `instrument`; NONE when never recorded.
    pub fn get(&self, instrument: &str) -> Verdict {
        self.records
            .read()
            .get(instrument)
            .map(|r| r.verdict.clone())
            .unwrap_or(Verdict::None)
    }

    /// Full record for `instrument`, if one was ever emitted.
    pub fn last(&self, instrument: &str) -> Option<SignalRecord> {
        self.records.read().get(instrument).cloned()
    }

    /// True iff `verdict` is actionable and differs in direction from the
    /// stored verdict. Repeated identical signals stay silent.
    pub fn should_notify(&self, instrument: &str, verdict: &Verdict) -> bool {
        verdict.is_actionable() && !verdict.same_signal(&self.get(instrument))
    }

    /// Overwrite the stored record. Called after the notify attempt, whether
    /// or not delivery succeeded. NONE never creates or alters a record.
    pub fn record(&self, instrument: &str, verdict: &Verdict, at: DateTime<Utc>) {
        if !verdict.is_actionable() {
            return;
        }

        let record = SignalRecord {
            instrument: instrument.to_string(),
            verdict: verdict.clone(),
            emitted_at: at,
        };
        debug!(instrument = %record.instrument, verdict = %record.verdict, "signal state updated");

        self.records.write().insert(instrument.to_string(), record);
    }
}
