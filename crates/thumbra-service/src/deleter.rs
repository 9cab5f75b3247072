//! Deletion pipeline: remove every thumbnail implied by a deleted original.

use std::sync::Arc;

use thumbra_core::{derivative_key, DerivativeSpec, ObjectKey, SourceFilter, StorageEvent};
use thumbra_storage::{StorageError, StorageGateway};

use crate::error::DeletionError;
use crate::Outcome;

pub struct ThumbnailDeleter {
    gateway: Arc<dyn StorageGateway>,
    filter: SourceFilter,
    sizes: Vec<DerivativeSpec>,
}

impl ThumbnailDeleter {
    pub fn new(
        gateway: Arc<dyn StorageGateway>,
        filter: SourceFilter,
        sizes: Vec<DerivativeSpec>,
    ) -> Self {
        Self {
            gateway,
            filter,
            sizes,
        }
    }

    /// Process one deletion event.
    ///
    /// The derivative keys are recomputed from the original's key, so the
    /// set removed here is exactly the set the generator would have written
    /// for the same configuration. The source object is already gone; its
    /// content type can only come from the event itself.
    pub async fn delete(&self, event: &StorageEvent) -> Result<Outcome, DeletionError> {
        let key = ObjectKey::parse(event.name.as_str());

        if let Some(rejection) = self.filter.check(&key, event.content_type.as_deref()) {
            tracing::info!(key = %key, reason = rejection.as_str(), "object skipped");
            return Ok(Outcome::Skipped(rejection));
        }

        for spec in &self.sizes {
            let derivative = derivative_key(key.as_str(), *spec);
            match self.gateway.delete(&event.bucket, &derivative).await {
                Ok(()) => {
                    tracing::debug!(key = %key, derivative = %derivative, "thumbnail deleted");
                }
                // A size added to the configuration after this original was
                // processed has no derivative yet; deletion stays tolerant.
                Err(StorageError::NotFound(_)) => {
                    tracing::debug!(key = %key, derivative = %derivative, "no thumbnail to delete");
                }
                Err(source) => {
                    return Err(DeletionError::DerivativeDelete {
                        key: key.as_str().to_string(),
                        derivative,
                        source,
                    });
                }
            }
        }

        tracing::info!(key = %key, sizes = self.sizes.len(), "thumbnails deleted");
        Ok(Outcome::Completed {
            sizes: self.sizes.len(),
        })
    }
}
