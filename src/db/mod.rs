// Package db provides the durable store for historical per-day records.

pub mod records;


// Re-export main types
pub use records::{DailyRecord, DbError, RecordStore};
