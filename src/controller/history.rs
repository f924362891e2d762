// Package api provides the historical records controller.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::RecordStore;
use crate::http::Controller;

use super::error::ApiError;

const DEFAULT_DAYS_BACK: i64 = 7;

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
struct HistoryQuery {
    days: Option<String>,
}

/// Three parallel sequences aligned by index, dates ascending.
#[derive(Debug, Serialize)]
struct HistoryResponse {
    dates: Vec<String>,
    fresh_counts: Vec<u64>,
    rotten_counts: Vec<u64>,
}

/// HistoryController serves per-day records for a trailing window.
pub struct HistoryController {
    records: Arc<RecordStore>,
    timezone: Tz,
}

impl HistoryController {
    /// Creates a new history controller.
    pub fn new(records: Arc<RecordStore>, timezone: Tz) -> Self {
        Self { records, timezone }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Handles the history request.
    async fn history(
        Query(params): Query<HistoryQuery>,
        State(controller): State<Arc<Self>>,
    ) -> Result<impl IntoResponse, ApiError> {
        let days_back = match params.days {
            None => DEFAULT_DAYS_BACK,
            Some(raw) => raw
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| ApiError::InvalidParameter(format!("days={raw:?}")))?,
        };

        let today = controller.today();
        // Any non-negative `days` is valid; a window reaching past the
        // calendar floor just means "everything on record".
        let start = today
            .checked_sub_signed(Duration::days(days_back))
            .unwrap_or(NaiveDate::MIN);

        let records = controller.records.history(start, today)?;

        let mut response = HistoryResponse {
            dates: Vec::with_capacity(records.len()),
            fresh_counts: Vec::with_capacity(records.len()),
            rotten_counts: Vec::with_capacity(records.len()),
        };
        for record in records {
            response.dates.push(record.date.format("%Y-%m-%d").to_string());
            response.fresh_counts.push(record.fresh_count);
            response.rotten_counts.push(record.rotten_count);
        }

        Ok(Json(response))
    }
}

impl Controller for HistoryController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            "/history",
            get(move |query: Query<HistoryQuery>| {
                let controller = controller.clone();
                async move { Self::history(query, State(controller)).await }
            }),
        )
    }
}

impl Clone for HistoryController {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            timezone: self.timezone,
        }
    }
}
