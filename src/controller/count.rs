// Package api provides the current counts controller.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

use crate::counter::TallyStore;
use crate::http::Controller;

/// CountController serves the live snapshot of today's counts.
pub struct CountController {
    store: Arc<TallyStore>,
}

impl CountController {
    /// Creates a new count controller.
    pub fn new(store: Arc<TallyStore>) -> Self {
        Self { store }
    }

    /// Handles the count request. No side effects.
    async fn count(State(controller): State<Arc<Self>>) -> impl IntoResponse {
        Json(controller.store.snapshot())
    }
}

impl Controller for CountController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            "/count",
            get(move || {
                let controller = controller.clone();
                async move { Self::count(State(controller)).await }
            }),
        )
    }
}

impl Clone for CountController {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
