//! Storage gateway for thumbra.
//!
//! The derivation pipelines never talk to a cloud SDK directly; they go
//! through the [`StorageGateway`] trait, constructed once at startup and
//! injected. That keeps the core logic testable against in-memory doubles
//! and keeps bucket/key addressing in one place.
//!
//! Keys must not contain `..` or a leading `/`; the local backend enforces
//! this before touching the filesystem.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectAttributes, StorageError, StorageGateway, StorageResult};
