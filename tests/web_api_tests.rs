//! Integration tests for the Opsdeck Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use opsdeck::config::Config;
use opsdeck::web::{create_router, AppState};

/// Creates a test AppState with a temporary order store.
fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let orders_path = temp_dir.path().join("orders.json");
    let state =
        AppState::new(Config::default(), orders_path).expect("Failed to create app state");
    (state, temp_dir)
}

/// Sends a JSON request and returns (status, parsed body).
async fn request_json(
    state: AppState,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |v| Body::from(v.to_string())))
        .unwrap();

    let response = create_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let (state, _dir) = create_test_state();
    let (status, body) = request_json(state, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_order_crud_roundtrip() {
    let (state, _dir) = create_test_state();

    let (status, created) = request_json(
        state.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "customer": "Acme",
            "design": "Harbor Blues",
            "width": 10,
            "height": 10,
            "due_date": "2026-09-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "draft");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) =
        request_json(state.clone(), "GET", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["customer"], "Acme");

    let (status, list) = request_json(state.clone(), "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) =
        request_json(state.clone(), "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(state, "GET", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revision_bumps_on_change() {
    let (state, _dir) = create_test_state();

    let (_, before) = request_json(state.clone(), "GET", "/api/orders/revision", None).await;
    assert_eq!(before["revision"], 0);

    request_json(
        state.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "customer": "Acme",
            "design": "Monochrome",
            "width": 5,
            "height": 5
        })),
    )
    .await;

    let (_, after) = request_json(state, "GET", "/api/orders/revision", None).await;
    assert_eq!(after["revision"], 1);
}

#[tokio::test]
async fn test_status_transitions_and_conflicts() {
    let (state, _dir) = create_test_state();

    let (_, created) = request_json(
        state.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "customer": "Acme",
            "design": "Poppy Field",
            "width": 5,
            "height": 5
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = request_json(
        state.clone(),
        "PUT",
        &format!("/api/orders/{id}/status"),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmed");

    // Confirmed cannot jump straight to shipped
    let (status, body) = request_json(
        state.clone(),
        "PUT",
        &format!("/api/orders/{id}/status"),
        Some(json!({"status": "shipped"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Illegal status transition"));

    // Unknown id is 404, not 409
    let missing = uuid::Uuid::new_v4();
    let (status, _) = request_json(
        state,
        "PUT",
        &format!("/api/orders/{missing}/status"),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_order_id_is_bad_request() {
    let (state, _dir) = create_test_state();
    let (status, _) = request_json(state, "GET", "/api/orders/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calc_distribution_with_design() {
    let (state, _dir) = create_test_state();
    let (status, body) = request_json(
        state,
        "POST",
        "/api/calc/distribution",
        Some(json!({
            "design": "Monochrome",
            "width": 7,
            "height": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pieces"], 14);
    let counts: Vec<u64> = body["distribution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["count"].as_u64().unwrap())
        .collect();
    assert_eq!(counts.iter().sum::<u64>(), 14);
}

#[tokio::test]
async fn test_calc_distribution_with_explicit_colors() {
    let (state, _dir) = create_test_state();
    let (status, body) = request_json(
        state,
        "POST",
        "/api/calc/distribution",
        Some(json!({
            "colors": ["#FF0000", "#00FF00", "#0000FF"],
            "width": 5,
            "height": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 10 over 3: base 3, one +1 adjustment
    assert_eq!(body["base_pieces_per_color"], 3);
    assert_eq!(body["adjustment_count"], 1);
}

#[tokio::test]
async fn test_calc_distribution_rejects_garbage() {
    let (state, _dir) = create_test_state();

    let (status, _) = request_json(
        state.clone(),
        "POST",
        "/api/calc/distribution",
        Some(json!({"design": "No Such Design", "width": 5, "height": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        state,
        "POST",
        "/api/calc/distribution",
        Some(json!({"colors": ["#nothex"], "width": 5, "height": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calc_setup() {
    let (state, _dir) = create_test_state();
    let (status, body) = request_json(
        state,
        "POST",
        "/api/calc/setup",
        Some(json!({"pieces": 250})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sheets"], 6);
    assert_eq!(body["boxes"], 3);
    assert_eq!(body["cartons"], 1);
}

#[tokio::test]
async fn test_plan_endpoint() {
    let (state, _dir) = create_test_state();

    let (_, created) = request_json(
        state.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "customer": "Acme",
            "design": "Forest Floor",
            "width": 10,
            "height": 10
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    request_json(
        state.clone(),
        "PUT",
        &format!("/api/orders/{id}/status"),
        Some(json!({"status": "confirmed"})),
    )
    .await;

    let (status, plan) = request_json(
        state,
        "POST",
        "/api/plan",
        Some(json!({"daily_capacity": 60, "start_date": "2026-08-24"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["days"].as_array().unwrap().len(), 2);
    assert_eq!(plan["forecasts"][0]["customer"], "Acme");
}

#[tokio::test]
async fn test_device_ws_rejects_unknown_kind() {
    let (state, _dir) = create_test_state();
    let (status, _) = request_json(state, "GET", "/api/devices/toaster/ws", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
