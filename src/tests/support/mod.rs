// Integration test support: the real router over in-memory state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::controller::{CountController, HistoryController, IndexController, UpdateController};
use crate::counter::TallyStore;
use crate::db::RecordStore;
use crate::http::{Controller, HttpServer};

/// The zone the test config runs in.
pub const TEST_TZ: chrono_tz::Tz = chrono_tz::Asia::Makassar;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<TallyStore>,
    pub records: Arc<RecordStore>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Current date in the test zone, the same way the handlers compute it.
pub fn today_in_test_tz() -> NaiveDate {
    Utc::now().with_timezone(&TEST_TZ).date_naive()
}

/// Builds the full router over fresh in-memory stores, with eager
/// persistence enabled (the default policy).
pub fn new_test_app(today: NaiveDate) -> TestApp {
    let store = Arc::new(TallyStore::new(today));
    let records = Arc::new(RecordStore::open_in_memory().expect("in-memory db"));

    let controllers: Vec<Box<dyn Controller>> = vec![
        Box::new(IndexController::new()),
        Box::new(UpdateController::new(store.clone(), records.clone(), true)),
        Box::new(CountController::new(store.clone())),
        Box::new(HistoryController::new(records.clone(), TEST_TZ)),
    ];
    let router = HttpServer::build_router(controllers);

    TestApp {
        router,
        store,
        records,
    }
}

/// Sends a POST with a JSON body and returns status plus parsed body.
pub async fn post_json(
    router: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    send(router, request).await
}

/// Sends a GET and returns status plus parsed body.
pub async fn get_json(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("request");

    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };

    (status, body)
}
