//! Creation pipeline: derive every configured thumbnail of a new original.

use std::sync::Arc;

use thumbra_core::{derivative_key, DerivativeSpec, ObjectKey, SourceFilter, StorageEvent};
use thumbra_processing::{RenderError, ThumbnailRenderer};
use thumbra_storage::StorageGateway;

use crate::error::DerivationError;
use crate::Outcome;

/// All thumbnails are JPEG regardless of source format.
const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

pub struct ThumbnailGenerator {
    gateway: Arc<dyn StorageGateway>,
    filter: SourceFilter,
    sizes: Vec<DerivativeSpec>,
}

impl ThumbnailGenerator {
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

    /// Process one creation event.
    ///
    /// Sizes are processed sequentially and independently, failing fast on
    /// the first error; derivatives already written stay in place. Combined
    /// with overwrite-on-write that makes redelivery of the same event
    /// converge on the fully derived state.
    pub async fn generate(&self, event: &StorageEvent) -> Result<Outcome, DerivationError> {
        let key = ObjectKey::parse(event.name.as_str());

        let content_type = match &event.content_type {
            Some(ct) => Some(ct.clone()),
            // Only worth a gateway round trip when the mode needs it and the
            // pattern has not already excluded the key.
            None if self.filter.needs_content_type() && !key.is_derivative() => self
                .gateway
                .get_attributes(&event.bucket, key.as_str())
                .await
                .map_err(|source| DerivationError::SourceRead {
                    key: key.as_str().to_string(),
                    source,
                })?
                .content_type,
            None => None,
        };

        if let Some(rejection) = self.filter.check(&key, content_type.as_deref()) {
            tracing::info!(key = %key, reason = rejection.as_str(), "object skipped");
            return Ok(Outcome::Skipped(rejection));
        }

        for spec in &self.sizes {
            self.generate_size(&event.bucket, &key, *spec).await?;
        }

        tracing::info!(key = %key, sizes = self.sizes.len(), "thumbnails generated");
        Ok(Outcome::Completed {
            sizes: self.sizes.len(),
        })
    }

    /// Read, render, and write one thumbnail size.
    ///
    /// The original is re-read per size instead of being decoded once and
    /// resized N times; at bucket-trigger scales the redundant I/O buys a
    /// loop body with no state shared between sizes.
    async fn generate_size(
        &self,
        bucket: &str,
        key: &ObjectKey,
        spec: DerivativeSpec,
    ) -> Result<(), DerivationError> {
        let data = self
            .gateway
            .download(bucket, key.as_str())
            .await
            .map_err(|source| DerivationError::SourceRead {
                key: key.as_str().to_string(),
                source,
            })?;

        let rendered = tokio::task::spawn_blocking(move || ThumbnailRenderer::render(&data, spec))
            .await
            .map_err(|source| DerivationError::RenderAborted {
                key: key.as_str().to_string(),
                spec,
                source,
            })?
            .map_err(|e| match e {
                RenderError::Decode(_) => DerivationError::Decode {
                    key: key.as_str().to_string(),
                    spec,
                    source: e,
                },
                RenderError::Encode(_) => DerivationError::Encode {
                    key: key.as_str().to_string(),
                    spec,
                    source: e,
                },
            })?;

        let derivative = derivative_key(key.as_str(), spec);
        self.gateway
            .upload(
                bucket,
                &derivative,
                Vec::from(rendered),
                THUMBNAIL_CONTENT_TYPE,
            )
            .await
            .map_err(|source| DerivationError::DerivativeWrite {
                key: key.as_str().to_string(),
                derivative: derivative.clone(),
                source,
            })?;

        tracing::debug!(key = %key, derivative = %derivative, "thumbnail written");
        Ok(())
    }
}
