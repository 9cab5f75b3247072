//! Thumbnail derivation pipelines.
//!
//! Two symmetric pipelines share the naming protocol from `thumbra-core`:
//! [`ThumbnailGenerator`] reacts to creation events, [`ThumbnailDeleter`] to
//! deletion events. Both are stateless per invocation; everything they need
//! is recomputed from the event's own key, so concurrent invocations for
//! different originals never touch the same derivative key space.

pub mod deleter;
pub mod error;
pub mod generator;

pub use deleter::ThumbnailDeleter;
pub use error::{DeletionError, DerivationError};
pub use generator::ThumbnailGenerator;

use thumbra_core::Rejection;

/// Result of processing one notification.
///
/// Skipping is a successful classification outcome, not an error: buckets
/// see heterogeneous traffic, and non-candidates must not trip the trigger
/// layer's retry machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was not a candidate for thumbnail work.
    Skipped(Rejection),
    /// Every configured size was processed.
    Completed { sizes: usize },
}
