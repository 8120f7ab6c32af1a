use bytes::Bytes;
use futures_util::future::join_all;
use std::future::Future;
use std::sync::Arc;

use crate::api::error::SystemError;
use crate::assets::{AssetConfig, AssetError};
use crate::storage::{keys, ObjectStorage, StorageError};

/// A file received with a request, bound for one field of one entity.
#[derive(Debug, Clone)]
pub struct UploadIntent {
    pub field: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadIntent {
    /// Falls back to a type guessed from the file name when the client sent
    /// none.
    pub fn new(
        field: &'static str,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        let file_name = file_name.unwrap_or_else(|| field.to_string());
        let content_type = content_type.filter(|ct| !ct.is_empty()).unwrap_or_else(|| {
            mime_guess::from_path(&file_name).first_or_octet_stream().to_string()
        });

        Self { field, file_name, content_type, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Keys written by one upload phase, by field name.
#[derive(Debug, Clone, Default)]
pub struct UploadedAssets {
    entries: Vec<(&'static str, String)>,
}

impl UploadedAssets {
    pub fn key(&self, field: &str) -> Option<String> {
        self.entries.iter().find(|(name, _)| *name == field).map(|(_, key)| key.clone())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, key)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Uploads files before the row that references them is written, and removes
/// them again when that write fails.
#[derive(Clone)]
pub struct AssetUploader {
    storage: Arc<dyn ObjectStorage>,
    compensate_partial_uploads: bool,
}

impl AssetUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: &AssetConfig) -> Self {
        Self { storage, compensate_partial_uploads: config.compensate_partial_uploads }
    }

    /// Upload every non-empty intent under `prefix`, then run `persist` with
    /// the written keys.
    ///
    /// An upload failure returns [`AssetError::Upload`] without calling
    /// `persist`. A `persist` failure deletes every key written here before
    /// returning [`AssetError::Persist`].
    pub async fn upload_and_persist<T, F, Fut>(
        &self,
        prefix: &str,
        intents: Vec<UploadIntent>,
        persist: F,
    ) -> Result<T, AssetError>
    where
        F: FnOnce(UploadedAssets) -> Fut,
        Fut: Future<Output = Result<T, SystemError>>,
    {
        let uploaded = self.upload(prefix, intents).await?;

        match persist(uploaded.clone()).await {
            Ok(value) => Ok(value),
            Err(err) => {
                log::warn!(
                    "Persist under {} failed ({}), removing {} uploaded object(s)",
                    prefix,
                    err,
                    uploaded.len()
                );
                self.compensate(&uploaded).await;
                Err(AssetError::Persist(err))
            }
        }
    }

    /// Delete everything stored under `prefix`. Returns how many objects were
    /// removed; an empty prefix never reaches the backend's delete.
    pub async fn remove_all_assets(&self, prefix: &str) -> Result<usize, StorageError> {
        let keys = self.storage.list_keys(prefix).await?;
        if keys.is_empty() {
            log::debug!("No assets stored under {}", prefix);
            return Ok(0);
        }

        self.storage.delete_batch(&keys).await?;
        log::info!("Removed {} asset(s) under {}", keys.len(), prefix);
        Ok(keys.len())
    }

    async fn upload(
        &self,
        prefix: &str,
        intents: Vec<UploadIntent>,
    ) -> Result<UploadedAssets, AssetError> {
        let pending: Vec<(String, UploadIntent)> = intents
            .into_iter()
            .filter(|intent| !intent.is_empty())
            .map(|intent| (keys::file_key(prefix, intent.field, &intent.file_name), intent))
            .collect();

        let results = join_all(pending.iter().map(|(key, intent)| {
            self.storage.put(key, &intent.content_type, intent.data.clone())
        }))
        .await;

        let mut uploaded = UploadedAssets::default();
        let mut failure = None;
        for ((key, intent), result) in pending.into_iter().zip(results) {
            match result {
                Ok(()) => uploaded.entries.push((intent.field, key)),
                Err(err) => {
                    log::error!("Upload of {} to {} failed: {}", intent.field, key, err);
                    failure.get_or_insert(err);
                }
            }
        }

        let Some(err) = failure else {
            return Ok(uploaded);
        };

        if self.compensate_partial_uploads {
            self.compensate(&uploaded).await;
        } else if !uploaded.is_empty() {
            log::warn!(
                "Leaving {} orphaned object(s) after a failed upload: {:?}",
                uploaded.len(),
                uploaded.keys().collect::<Vec<_>>()
            );
        }

        Err(AssetError::Upload(err))
    }

    /// Best effort: failures are logged and never retried.
    async fn compensate(&self, uploaded: &UploadedAssets) {
        let results = join_all(uploaded.keys().map(|key| async move {
            (key, self.storage.delete(key).await)
        }))
        .await;

        for (key, result) in results {
            if let Err(err) = result {
                log::error!("Could not remove {} while rolling back: {}", key, err);
            }
        }
    }
}
