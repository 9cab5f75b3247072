//! Inbound storage notification model.

use serde::Deserialize;

/// A single object-creation or object-deletion notification.
///
/// Produced by the trigger layer from the notification payload and consumed
/// once; the wire names (`bucket`, `name`, `contentType`) follow the bucket
/// notification format. `content_type` is optional — some delivery setups
/// omit it, in which case eligibility falls back to the gateway or to the
/// key suffix depending on the configured mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    pub bucket: String,
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
}
