// HTTP API controllers for the tally endpoints.

pub mod controller;
pub mod count;
pub mod error;
pub mod history;
pub mod index;
pub mod update;

// Re-export controller types for convenience
pub use count::CountController;
pub use error::ApiError;
pub use history::HistoryController;
pub use index::IndexController;
pub use update::UpdateController;
