// Package counter provides the in-memory tally for the current day.

pub mod store;


// Re-export main types
pub use store::{DayTotals, Label, TallyError, TallySnapshot, TallyStore};
