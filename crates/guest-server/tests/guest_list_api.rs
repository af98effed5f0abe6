//! Drives the `/guest-list` router end to end over an in-memory bucket.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use guest_core::seed::seed_households;
use guest_server::{AppState, app};
use guest_store::{GuestListService, HouseholdStore};

fn configured() -> Router {
    app(AppState::new(GuestListService::new(HouseholdStore::in_memory())))
}

async fn send(
    router: &Router,
    method: Method,
    body: Option<Value>,
) -> (StatusCode, header::HeaderMap, Value) {
    let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
    let request = Request::builder()
        .method(method)
        .uri("/guest-list")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

fn ids(body: &Value) -> Vec<String> {
    body["households"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn preflight_returns_cors_headers() {
    let (status, headers, _) = send(&configured(), Method::OPTIONS, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET,POST,OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}

#[tokio::test]
async fn empty_store_returns_empty_list() {
    let (status, headers, body) = send(&configured(), Method::GET, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, json!({"households": [], "updatedAt": null}));
}

#[tokio::test]
async fn upsert_then_delete_round_trip() {
    let router = configured();
    let households = seed_households();
    let a = serde_json::to_value(&households[0]).unwrap();
    let b = serde_json::to_value(&households[1]).unwrap();

    let (status, _, saved) = send(
        &router,
        Method::POST,
        Some(json!({"upserts": [a.clone(), b.clone()], "deletes": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["saved"], true);
    assert_eq!(saved["upserted"], 2);
    assert_eq!(saved["deleted"], 0);
    assert!(saved["updatedAt"].is_string());

    let (_, _, listed) = send(&router, Method::GET, None).await;
    assert_eq!(listed["households"], json!([a, b]));
    assert_eq!(listed["updatedAt"], saved["updatedAt"]);

    let (_, _, saved) = send(
        &router,
        Method::POST,
        Some(json!({"upserts": [], "deletes": [households[0].id]})),
    )
    .await;
    assert_eq!(saved["deleted"], 1);

    let (_, _, listed) = send(&router, Method::GET, None).await;
    assert_eq!(ids(&listed), vec![households[1].id.clone()]);
}

#[tokio::test]
async fn full_replace_reports_migrated() {
    let router = configured();
    let households = seed_households();
    let (status, _, saved) = send(
        &router,
        Method::POST,
        Some(json!({ "households": households })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["migrated"], true);
    assert_eq!(saved["upserted"], 3);

    let (_, _, listed) = send(&router, Method::GET, None).await;
    assert_eq!(ids(&listed).len(), 3);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/guest-list")
        .body(Body::from("{not json"))
        .unwrap();
    let response = configured().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Invalid JSON"}));
}

#[tokio::test]
async fn unknown_shape_is_400() {
    let (status, _, body) = send(&configured(), Method::POST, Some(json!({"rows": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Expected { upserts, deletes } or { households }"})
    );
}

#[tokio::test]
async fn missing_bucket_is_500_on_every_method() {
    let router = app(AppState::unconfigured());
    for method in [Method::GET, Method::POST] {
        let (status, headers, body) =
            send(&router, method, Some(json!({"upserts": []}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body, json!({"error": "Missing S3 bucket configuration"}));
    }
}

#[tokio::test]
async fn other_methods_are_405() {
    let (status, headers, body) = send(&configured(), Method::DELETE, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body, json!({"error": "Method not allowed"}));
}
