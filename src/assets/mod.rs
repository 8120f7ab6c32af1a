//! Media assets of the catalogue: uploading them next to row writes and
//! turning stored keys into signed URLs on the way out.

pub mod presign;
pub mod upload;

use std::time::Duration;

use crate::api::error::SystemError;
use crate::storage::StorageError;

pub use presign::{AssetFields, AssetResolver, Presignable};
pub use upload::{AssetUploader, UploadIntent};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Writing to object storage failed; nothing was persisted.
    #[error("Upload failed: {0}")]
    Upload(StorageError),
    /// The row write failed after the uploads went through. The uploads
    /// have already been compensated when this is returned.
    #[error("Persist failed: {0}")]
    Persist(SystemError),
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub presign_ttl: Duration,
    /// Delete the uploads that succeeded when a sibling upload of the same
    /// operation fails.
    pub compensate_partial_uploads: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            presign_ttl: Duration::from_secs(3600),
            compensate_partial_uploads: false,
        }
    }
}
