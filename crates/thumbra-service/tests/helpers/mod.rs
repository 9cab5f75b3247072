//! Shared helpers for the pipeline tests: image fixtures and an in-memory
//! gateway double with failure injection.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use thumbra_storage::{ObjectAttributes, StorageError, StorageGateway, StorageResult};

pub fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 60, 60, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

#[derive(Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory storage gateway.
///
/// Tracks every gateway call so tests can assert that ineligible events
/// perform no storage work, and injects failures by key prefix. Unlike the
/// real backends it reports `NotFound` for deletes of absent keys, which
/// exercises the deleter's tolerant arm.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: AtomicUsize,
    fail_upload_prefix: Mutex<Option<String>>,
    fail_delete_prefix: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.get(bucket, key).is_some()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_uploads_with_prefix(&self, prefix: &str) {
        *self.fail_upload_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    pub fn fail_deletes_with_prefix(&self, prefix: &str) {
        *self.fail_delete_prefix.lock().unwrap() = Some(prefix.to_string());
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn get_attributes(&self, bucket: &str, key: &str) -> StorageResult<ObjectAttributes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let object = self
            .get(bucket, key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(ObjectAttributes {
            content_type: Some(object.content_type),
            size: Some(object.data.len() as u64),
        })
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.get(bucket, key)
            .map(|o| o.data)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(prefix) = self.fail_upload_prefix.lock().unwrap().as_deref() {
            if key.starts_with(prefix) {
                return Err(StorageError::UploadFailed(format!(
                    "injected failure for {key}"
                )));
            }
        }
        self.insert(bucket, key, data, content_type);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(prefix) = self.fail_delete_prefix.lock().unwrap().as_deref() {
            if key.starts_with(prefix) {
                return Err(StorageError::DeleteFailed(format!(
                    "injected failure for {key}"
                )));
            }
        }
        let removed = self
            .objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        match removed {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }
}
