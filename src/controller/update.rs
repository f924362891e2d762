// Package api provides the classification update controller.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::counter::{Label, TallyStore};
use crate::db::RecordStore;
use crate::http::Controller;

use super::error::ApiError;

/// Request body for the update endpoint.
#[derive(Deserialize)]
struct UpdateBody {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// UpdateController receives one classification outcome per request.
pub struct UpdateController {
    store: Arc<TallyStore>,
    records: Arc<RecordStore>,
    persist_on_update: bool,
}

impl UpdateController {
    /// Creates a new update controller.
    pub fn new(store: Arc<TallyStore>, records: Arc<RecordStore>, persist_on_update: bool) -> Self {
        Self {
            store,
            records,
            persist_on_update,
        }
    }

    /// Handles the update request.
    ///
    /// Exactly one increment per request. When eager persistence is on,
    /// today's row is upserted with the post-increment totals after the
    /// counter lock is released; an upsert failure is reported to the
    /// caller but the increment stands. The upsert itself is monotonic,
    /// so a snapshot overtaken by midnight rollover never shrinks the
    /// closed day's row.
    async fn update(
        State(controller): State<Arc<Self>>,
        Json(body): Json<UpdateBody>,
    ) -> Result<impl IntoResponse, ApiError> {
        let raw = body.kind.unwrap_or_default();
        let label = Label::parse(&raw)?;

        let snap = controller.store.increment(label);

        debug!(
            component = "update",
            event = "incremented",
            label = label.as_str(),
            fresh = snap.fresh,
            rotten = snap.rotten,
            "classification recorded"
        );

        if controller.persist_on_update {
            if let Err(e) = controller
                .records
                .upsert_day(snap.last_reset, snap.fresh, snap.rotten)
            {
                error!(
                    component = "update",
                    event = "eager_persist_failed",
                    date = %snap.last_reset,
                    error = %e,
                    "failed to upsert today's record"
                );
                return Err(e.into());
            }
        }

        Ok(Json(serde_json::json!({ "success": true })))
    }
}

impl Controller for UpdateController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            "/update",
            post(move |body: Json<UpdateBody>| {
                let controller = controller.clone();
                async move { Self::update(State(controller), body).await }
            }),
        )
    }
}

impl Clone for UpdateController {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            records: self.records.clone(),
            persist_on_update: self.persist_on_update,
        }
    }
}
