// HTTP module: server and common controller interface.

pub mod server;

// Re-export server types
pub use server::server::{HttpServer, Server};

// Common controller interface
pub use crate::controller::controller::Controller;
