//! Router-level tests for event ingestion.

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use tempfile::TempDir;
use thumbra_core::{Config, EligibilityMode, StorageBackend};
use thumbra_server::routes::{build_router, EVENT_TYPE_DELETED, EVENT_TYPE_FINALIZED};
use thumbra_server::state::AppState;
use thumbra_storage::{LocalStorage, StorageGateway};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        storage_backend: StorageBackend::Local,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: None,
        thumbnail_sizes: vec![32, 64],
        eligibility_mode: EligibilityMode::ContentType,
        allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
    }
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([60, 60, 200, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

async fn test_app() -> (Router, Arc<dyn StorageGateway>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let gateway: Arc<dyn StorageGateway> =
        Arc::new(LocalStorage::new(dir.path()).await.unwrap());
    let state = Arc::new(AppState::new(&test_config(), gateway.clone()));
    (build_router(state), gateway, dir)
}

async fn post_event(router: &Router, event_type: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/events")
        .header("ce-type", event_type)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn finalized_event_generates_thumbnails() {
    let (router, gateway, _dir) = test_app().await;
    gateway
        .upload("uploads", "photo.png", png_fixture(128, 96), "image/png")
        .await
        .unwrap();

    let (status, body) = post_event(
        &router,
        EVENT_TYPE_FINALIZED,
        json!({"bucket": "uploads", "name": "photo.png", "contentType": "image/png"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    for key in ["32x32@photo.png", "64x64@photo.png"] {
        let thumb = gateway.download("uploads", key).await.unwrap();
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
    }
}

#[tokio::test]
async fn deleted_event_removes_thumbnails() {
    let (router, gateway, _dir) = test_app().await;
    gateway
        .upload("uploads", "photo.png", png_fixture(128, 96), "image/png")
        .await
        .unwrap();

    let event = json!({"bucket": "uploads", "name": "photo.png", "contentType": "image/png"});
    post_event(&router, EVENT_TYPE_FINALIZED, event.clone()).await;

    let (status, body) = post_event(&router, EVENT_TYPE_DELETED, event).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    assert!(gateway.download("uploads", "32x32@photo.png").await.is_err());
    assert!(gateway.download("uploads", "64x64@photo.png").await.is_err());
}

#[tokio::test]
async fn non_image_event_is_skipped() {
    let (router, _gateway, _dir) = test_app().await;

    let (status, body) = post_event(
        &router,
        EVENT_TYPE_FINALIZED,
        json!({"bucket": "uploads", "name": "notes.pdf", "contentType": "application/pdf"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "skipped");
}

#[tokio::test]
async fn derivative_key_event_is_skipped() {
    let (router, _gateway, _dir) = test_app().await;

    let (status, body) = post_event(
        &router,
        EVENT_TYPE_FINALIZED,
        json!({"bucket": "uploads", "name": "32x32@photo.png", "contentType": "image/jpeg"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "skipped");
}

#[tokio::test]
async fn unknown_event_type_is_ignored() {
    let (router, _gateway, _dir) = test_app().await;

    let (status, body) = post_event(
        &router,
        "google.cloud.storage.object.v1.metadataUpdated",
        json!({"bucket": "uploads", "name": "photo.png", "contentType": "image/png"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn missing_source_reports_server_error() {
    let (router, _gateway, _dir) = test_app().await;

    let (status, body) = post_event(
        &router,
        EVENT_TYPE_FINALIZED,
        json!({"bucket": "uploads", "name": "missing.png", "contentType": "image/png"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("missing.png"));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (router, _gateway, _dir) = test_app().await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
