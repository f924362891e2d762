// HTTP controller trait for route registration.

use axum::Router;

/// Trait implemented by every endpoint controller; the server folds all
/// controllers over one router at startup.
pub trait Controller: Send + Sync {
    /// Registers this controller's route(s) on the router.
    fn add_route(&self, router: Router) -> Router;
}
