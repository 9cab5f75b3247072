//! Event ingestion routes.
//!
//! Notifications arrive as CloudEvents in binary content mode: the event
//! type travels in the `ce-type` header and the body is the storage
//! notification JSON. The endpoint answers 2xx for anything that was
//! handled or deliberately ignored, and 5xx only when a pipeline failed and
//! the delivery layer should redeliver.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use thumbra_core::StorageEvent;
use thumbra_service::Outcome;
use tower_http::trace::TraceLayer;

use crate::error::HttpError;
use crate::state::AppState;

/// CloudEvents type emitted when an object is created or overwritten.
pub const EVENT_TYPE_FINALIZED: &str = "google.cloud.storage.object.v1.finalized";
/// CloudEvents type emitted when an object is deleted.
pub const EVENT_TYPE_DELETED: &str = "google.cloud.storage.object.v1.deleted";

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events", post(receive_event))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(serde::Serialize)]
struct EventResponse {
    status: &'static str,
}

impl EventResponse {
    fn from_outcome(outcome: &Outcome) -> Self {
        let status = match outcome {
            Outcome::Skipped(_) => "skipped",
            Outcome::Completed { .. } => "completed",
        };
        Self { status }
    }
}

async fn receive_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<StorageEvent>,
) -> Result<impl IntoResponse, HttpError> {
    let event_type = headers
        .get("ce-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match event_type {
        EVENT_TYPE_FINALIZED => {
            let outcome = state.generator.generate(&event).await?;
            Ok(Json(EventResponse::from_outcome(&outcome)))
        }
        EVENT_TYPE_DELETED => {
            let outcome = state.deleter.delete(&event).await?;
            Ok(Json(EventResponse::from_outcome(&outcome)))
        }
        other => {
            // Subscriptions can be broader than this service; an unknown
            // type is the delivery layer's business, not a failure.
            tracing::warn!(event_type = %other, key = %event.name, "ignoring unsupported event type");
            Ok(Json(EventResponse { status: "ignored" }))
        }
    }
}
