//! Shared application state: the two pipelines over one gateway.

use std::sync::Arc;

use thumbra_core::{Config, SourceFilter};
use thumbra_service::{ThumbnailDeleter, ThumbnailGenerator};
use thumbra_storage::StorageGateway;

pub struct AppState {
    pub generator: ThumbnailGenerator,
    pub deleter: ThumbnailDeleter,
}

impl AppState {
    pub fn new(config: &Config, gateway: Arc<dyn StorageGateway>) -> Self {
        let filter = SourceFilter::from_config(config);
        let sizes = config.derivative_specs();

        Self {
            generator: ThumbnailGenerator::new(gateway.clone(), filter.clone(), sizes.clone()),
            deleter: ThumbnailDeleter::new(gateway, filter, sizes),
        }
    }
}
