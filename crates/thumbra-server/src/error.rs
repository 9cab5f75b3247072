//! HTTP error mapping for the event endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thumbra_service::{DeletionError, DerivationError};

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Deletion(#[from] DeletionError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "event processing failed");

        // Always a 5xx: the delivery layer treats it as a failed invocation
        // and redelivers, which is safe against these idempotent pipelines.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
