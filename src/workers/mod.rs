// Background workers owned by the application lifecycle.

pub mod rollover;


// Re-export main types
pub use rollover::{Rollover, RolloverPolicy};
