//! Health, uploads and documentation route tests.
//!
//! Run with: `cargo test -p ecosort-api --test routes_test`

mod helpers;

use helpers::fixtures::create_minimal_png;
use helpers::{setup_test_app, TestOptions};
use serde_json::Value;

const CLIENT_ORIGIN: &str = "http://localhost:5173";

#[tokio::test]
async fn test_health_reports_service() {
    let app = setup_test_app(TestOptions::default()).await;

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "waste-classification-api");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].as_str().is_some());
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_deep_health_with_healthy_classifier() {
    let mut ml = mockito::Server::new_async().await;
    let _mock = ml
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"healthy","model_loaded":true}"#)
        .create_async()
        .await;

    let app = setup_test_app(TestOptions::with_ml_service(ml.url())).await;

    let response = app.client().get("/api/health/deep").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier"], "healthy");
    assert_eq!(body["upload_dir"], "healthy");
}

#[tokio::test]
async fn test_deep_health_degraded_when_classifier_down() {
    let mut ml = mockito::Server::new_async().await;
    let _mock = ml
        .mock("GET", "/health")
        .with_status(500)
        .create_async()
        .await;

    let app = setup_test_app(TestOptions::with_ml_service(ml.url())).await;

    let response = app.client().get("/api/health/deep").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert!(body["classifier"].as_str().unwrap().starts_with("unhealthy"));
}

#[tokio::test]
async fn test_uploads_serves_file_with_client_cors() {
    let app = setup_test_app(TestOptions::default()).await;
    let images = app.config.upload_dir.join("images");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::write(images.join("leaf.png"), create_minimal_png()).unwrap();

    let response = app
        .client()
        .get("/uploads/images/leaf.png")
        .add_header("origin", CLIENT_ORIGIN)
        .await;

    assert_eq!(response.status_code(), 200);
    let headers = response.headers();
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["access-control-allow-origin"], CLIENT_ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(response.as_bytes().to_vec(), create_minimal_png());
}

#[tokio::test]
async fn test_uploads_missing_file_is_not_found() {
    let app = setup_test_app(TestOptions::default()).await;

    let response = app.client().get("/uploads/nothing-here.jpg").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["error"], "File not found");
}

#[tokio::test]
async fn test_uploads_does_not_expose_in_flight_files() {
    let app = setup_test_app(TestOptions::default()).await;
    std::fs::write(app.temp_upload_dir().join("pending.png"), b"x").unwrap();

    let response = app.client().get("/uploads/temp/pending.png").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_openapi_document_lists_predict() {
    let app = setup_test_app(TestOptions::default()).await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/ml/predict"]["post"].is_object());
}
