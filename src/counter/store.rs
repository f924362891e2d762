//! Counter store implementation.

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;

/// Counter store errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("invalid label: {0:?}")]
    InvalidLabel(String),
}

/// Classification outcome reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Fresh,
    Rotten,
}

impl Label {
    /// Parses the wire representation of a label.
    pub fn parse(raw: &str) -> Result<Self, TallyError> {
        match raw {
            "fresh" => Ok(Label::Fresh),
            "rotten" => Ok(Label::Rotten),
            other => Err(TallyError::InvalidLabel(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fresh => "fresh",
            Label::Rotten => "rotten",
        }
    }
}

/// Consistent point-in-time view of the counter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallySnapshot {
    pub fresh: u64,
    pub rotten: u64,
    pub last_reset: NaiveDate,
}

/// Totals closed out for a finished day at rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub fresh: u64,
    pub rotten: u64,
}

struct CounterState {
    fresh: u64,
    rotten: u64,
    last_reset: NaiveDate,
}

/// Process-wide counter state for the current day.
///
/// A single mutex covers every read and write. Critical sections stay tiny:
/// durable writes never happen while the lock is held.
pub struct TallyStore {
    state: Mutex<CounterState>,
}

impl TallyStore {
    /// Creates a store with zero counts attributed to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(CounterState {
                fresh: 0,
                rotten: 0,
                last_reset: today,
            }),
        }
    }

    /// Increments the counter for `label` and returns the post-increment
    /// snapshot, so callers can persist it without re-taking the lock.
    pub fn increment(&self, label: Label) -> TallySnapshot {
        let mut state = self.state.lock();
        match label {
            Label::Fresh => state.fresh += 1,
            Label::Rotten => state.rotten += 1,
        }
        TallySnapshot {
            fresh: state.fresh,
            rotten: state.rotten,
            last_reset: state.last_reset,
        }
    }

    /// Reads the current counts without mutation.
    pub fn snapshot(&self) -> TallySnapshot {
        let state = self.state.lock();
        TallySnapshot {
            fresh: state.fresh,
            rotten: state.rotten,
            last_reset: state.last_reset,
        }
    }

    /// Closes out the day if `today` differs from the stored reset date.
    ///
    /// On rollover the pre-reset totals are returned keyed by the old date,
    /// both counters are zeroed and the reset date moves to `today`, all as
    /// one atomic unit. Returns `None` when the dates match, which makes the
    /// operation idempotent per date.
    pub fn reset_if_rolled_over(&self, today: NaiveDate) -> Option<DayTotals> {
        let mut state = self.state.lock();
        if state.last_reset == today {
            return None;
        }

        let closed = DayTotals {
            date: state.last_reset,
            fresh: state.fresh,
            rotten: state.rotten,
        };

        state.fresh = 0;
        state.rotten = 0;
        state.last_reset = today;

        Some(closed)
    }
}
