// Application wiring and lifecycle.

pub mod app;

pub use app::App;
