//! Pipeline error types.
//!
//! Every variant names the original key, and the per-size variants carry the
//! failing dimension, so one log line at the trigger layer is enough to
//! locate the failure. Nothing here is retried internally; the hosting
//! layer's at-least-once redelivery composes safely because both pipelines
//! are idempotent.

use thiserror::Error;
use thumbra_core::DerivativeSpec;
use thumbra_processing::RenderError;
use thumbra_storage::StorageError;

/// Failure while generating thumbnails for one creation event.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// The original could not be read (or its attributes looked up).
    #[error("failed to read original {key:?}")]
    SourceRead {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to decode {key:?} for the {spec} thumbnail")]
    Decode {
        key: String,
        spec: DerivativeSpec,
        #[source]
        source: RenderError,
    },

    #[error("failed to encode the {spec} thumbnail of {key:?}")]
    Encode {
        key: String,
        spec: DerivativeSpec,
        #[source]
        source: RenderError,
    },

    /// The render task panicked or was cancelled by the runtime.
    #[error("render task for the {spec} thumbnail of {key:?} was aborted")]
    RenderAborted {
        key: String,
        spec: DerivativeSpec,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("failed to write thumbnail {derivative:?} of {key:?}")]
    DerivativeWrite {
        key: String,
        derivative: String,
        #[source]
        source: StorageError,
    },
}

/// Failure while deleting thumbnails for one deletion event.
#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("failed to delete thumbnail {derivative:?} of {key:?}")]
    DerivativeDelete {
        key: String,
        derivative: String,
        #[source]
        source: StorageError,
    },
}
