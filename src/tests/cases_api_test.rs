//! Router-level tests for the update, count, history and index endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::support::{date, get_json, new_test_app, post_json, today_in_test_tz};

#[tokio::test]
async fn test_update_accepts_fresh_and_rotten() {
    let app = new_test_app(date(2024, 6, 1));

    let (status, body) = post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, _) = post_json(&app.router, "/update", json!({"type": "rotten"})).await;
    assert_eq!(status, StatusCode::OK);

    let snap = app.store.snapshot();
    assert_eq!(snap.fresh, 1);
    assert_eq!(snap.rotten, 1);
}

#[tokio::test]
async fn test_update_eagerly_persists_todays_record() {
    let app = new_test_app(date(2024, 6, 1));

    post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    post_json(&app.router, "/update", json!({"type": "rotten"})).await;

    let record = app
        .records
        .get_day(date(2024, 6, 1))
        .unwrap()
        .expect("today's row upserted on each update");
    assert_eq!(record.fresh_count, 2);
    assert_eq!(record.rotten_count, 1);
}

#[tokio::test]
async fn test_update_rejects_unknown_label() {
    let app = new_test_app(date(2024, 6, 1));

    let (status, body) = post_json(&app.router, "/update", json!({"type": "spoiled"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    // Counters untouched.
    let snap = app.store.snapshot();
    assert_eq!(snap.fresh + snap.rotten, 0);
    assert!(app.records.get_day(date(2024, 6, 1)).unwrap().is_none());
}

#[tokio::test]
async fn test_update_rejects_missing_type() {
    let app = new_test_app(date(2024, 6, 1));

    let (status, body) = post_json(&app.router, "/update", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_count_returns_snapshot_document() {
    let app = new_test_app(date(2024, 6, 1));

    post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    post_json(&app.router, "/update", json!({"type": "fresh"})).await;
    post_json(&app.router, "/update", json!({"type": "rotten"})).await;

    let (status, body) = get_json(&app.router, "/count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fresh"], json!(3));
    assert_eq!(body["rotten"], json!(1));
    assert_eq!(body["last_reset"], json!("2024-06-01"));
}

#[tokio::test]
async fn test_history_defaults_to_seven_days_back() {
    let today = today_in_test_tz();
    let app = new_test_app(today);

    // Ten days of rows ending today; only [today-7, today] may come back.
    for i in 0..10 {
        let day = today - chrono::Duration::days(i);
        app.records.upsert_day(day, 10 + i as u64, i as u64).unwrap();
    }

    let (status, body) = get_json(&app.router, "/history").await;
    assert_eq!(status, StatusCode::OK);

    let dates = body["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 8);
    assert_eq!(
        dates.first().unwrap(),
        &json!((today - chrono::Duration::days(7)).format("%Y-%m-%d").to_string())
    );
    assert_eq!(
        dates.last().unwrap(),
        &json!(today.format("%Y-%m-%d").to_string())
    );

    // Parallel arrays align by index.
    let fresh = body["fresh_counts"].as_array().unwrap();
    let rotten = body["rotten_counts"].as_array().unwrap();
    assert_eq!(fresh.len(), 8);
    assert_eq!(rotten.len(), 8);
    assert_eq!(fresh.last().unwrap(), &json!(10));
    assert_eq!(rotten.last().unwrap(), &json!(0));
}

#[tokio::test]
async fn test_history_days_zero_returns_only_today() {
    let today = today_in_test_tz();
    let app = new_test_app(today);

    app.records.upsert_day(today, 5, 2).unwrap();
    app.records
        .upsert_day(today - chrono::Duration::days(1), 9, 9)
        .unwrap();

    let (status, body) = get_json(&app.router, "/history?days=0").await;
    assert_eq!(status, StatusCode::OK);

    let dates = body["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(body["fresh_counts"], json!([5]));
    assert_eq!(body["rotten_counts"], json!([2]));
}

#[tokio::test]
async fn test_history_with_no_records_returns_empty_arrays() {
    let app = new_test_app(today_in_test_tz());

    let (status, body) = get_json(&app.router, "/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dates"], json!([]));
    assert_eq!(body["fresh_counts"], json!([]));
    assert_eq!(body["rotten_counts"], json!([]));
}

#[tokio::test]
async fn test_history_rejects_malformed_days() {
    let app = new_test_app(today_in_test_tz());

    for bad in ["abc", "-1", "1.5", ""] {
        let (status, body) = get_json(&app.router, &format!("/history?days={bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={bad:?}");
        assert_eq!(body["success"], json!(false));
    }
}

#[tokio::test]
async fn test_history_accepts_huge_days_value() {
    let today = today_in_test_tz();
    let app = new_test_app(today);

    app.records.upsert_day(today, 3, 1).unwrap();

    // u32::MAX days reaches past the calendar floor; the window clamps
    // instead of failing and everything on record comes back.
    let (status, body) = get_json(&app.router, "/history?days=4294967295").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fresh_counts"], json!([3]));
    assert_eq!(body["rotten_counts"], json!([1]));
}

#[tokio::test]
async fn test_index_serves_landing_page() {
    let app = new_test_app(today_in_test_tz());

    let (status, body) = get_json(&app.router, "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = body.as_str().unwrap();
    assert!(html.contains("FreshTally"));
}
