//! Object storage contract.
//!
//! The asset workflow and the presigner only talk to storage through
//! [`ObjectStorage`], so any backend that can write, delete, list by prefix
//! and hand out time-limited read URLs can be plugged in at startup.

pub mod keys;
#[cfg(test)]
pub mod mock;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub use s3::S3Storage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()>;

    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Delete every key in one request. Must not touch the backend when
    /// `keys` is empty.
    async fn delete_batch(&self, keys: &[String]) -> StorageResult<()>;

    /// Keys of every object stored under `prefix`.
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// A GET URL for `key` that stops working after `expires_in`.
    async fn read_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;
}
