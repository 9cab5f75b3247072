//! Storage abstraction trait
//!
//! This module defines the StorageGateway trait that all storage backends
//! must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata of a stored object, as far as the backend exposes it.
#[derive(Debug, Clone, Default)]
pub struct ObjectAttributes {
    pub content_type: Option<String>,
    pub size: Option<u64>,
}

/// Storage abstraction trait
///
/// Every operation is addressed by `(bucket, key)`; the backends hold no
/// per-object state beyond what the store itself keeps, which is what makes
/// concurrent invocations for different keys trivially safe.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Look up an object's attributes. Fails with `NotFound` if absent.
    async fn get_attributes(&self, bucket: &str, key: &str) -> StorageResult<ObjectAttributes>;

    /// Read an object's full byte content.
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Write an object, unconditionally replacing anything at `key`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Delete an object. Deleting an absent object succeeds, so repeated
    /// deletion of the same derived set converges instead of failing.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;
}
