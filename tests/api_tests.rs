/// HTTP tests driving the full router against the in-memory store
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use phone_address_api::config::{Config, StoreBackend};
use phone_address_api::handlers::AppState;
use phone_address_api::routes;
use phone_address_api::store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let config = Config {
        store_backend: StoreBackend::Memory,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(Arc::new(MemoryStore::new()), config));
    routes::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_normalizes_and_returns_created() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "8 (999) 123-45-67", "address": "Moscow"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"phone": "+79991234567", "address": "Moscow"}));
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = test_app();
    let create = json!({"phone": "+79991234567", "address": "Moscow"});

    let (status, _) = send(&app, Method::POST, "/phones", Some(create)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "79991234567", "address": "Other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Phone already exists");

    let (status, body) = send(&app, Method::GET, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "Moscow");
}

#[tokio::test]
async fn test_get_accepts_national_spelling_in_path() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "+79991234567", "address": "Moscow"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/phones/89991234567", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"phone": "+79991234567", "address": "Moscow"}));
}

#[tokio::test]
async fn test_missing_phone_is_not_found() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Phone not found");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/phones/+79991234567",
        Some(json!({"address": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // update on a missing phone must not create it
    let (status, _) = send(&app, Method::GET, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_then_delete() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "+79991234567", "address": "A"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/phones/+79991234567",
        Some(json!({"address": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"phone": "+79991234567", "address": "B"}));

    let (status, body) = send(&app, Method::DELETE, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_phone_is_unprocessable() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "12345", "address": "Moscow"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("phone number"));

    let (status, _) = send(&app, Method::GET, "/phones/12345", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_address_too_long_is_unprocessable() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/phones",
        Some(json!({"phone": "+79991234567", "address": "a".repeat(256)})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // nothing was stored
    let (status, _) = send(&app, Method::GET, "/phones/+79991234567", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/phones/{phone}"].is_object());
}
