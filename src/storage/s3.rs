use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt, TryStreamExt};
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload};
use std::time::{Duration, Instant};

use crate::storage::{ObjectStorage, StorageError, StorageResult};

/// S3 (or S3-compatible) bucket accessed through `object_store`.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// `endpoint_url` points at an S3-compatible provider such as MinIO
    /// (`http://localhost:9000`); leave it empty for AWS.
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder.build().map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        let start = Instant::now();
        let size = data.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions { attributes, ..Default::default() };

        ObjectStore::put_opts(&self.store, &location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = Instant::now();
        let location = Path::from(key);

        ObjectStoreExt::delete(&self.store, &location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn delete_batch(&self, keys: &[String]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let start = Instant::now();
        let locations: Vec<object_store::Result<Path>> =
            keys.iter().map(|key| Ok(Path::from(key.as_str()))).collect();

        let deleted: Vec<Path> =
            ObjectStore::delete_stream(&self.store, stream::iter(locations).boxed())
                .try_collect()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        count = keys.len(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 batch delete failed"
                    );
                    StorageError::DeleteFailed(e.to_string())
                })?;

        tracing::info!(
            bucket = %self.bucket,
            count = deleted.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 batch delete successful"
        );

        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let location = Path::from(prefix);

        ObjectStore::list(&self.store, Some(&location))
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    prefix = %prefix,
                    "S3 listing failed"
                );
                StorageError::ListFailed(e.to_string())
            })
    }

    async fn read_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key);

        let url = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(url.to_string())
    }
}
