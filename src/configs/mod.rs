use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::error,
    assets::AssetConfig,
    storage::{ObjectStorage, S3Storage},
    ENV,
};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations applied");

    Ok(pool)
}

pub fn connect_storage() -> Result<Arc<dyn ObjectStorage>, error::SystemError> {
    let storage =
        S3Storage::new(ENV.s3_bucket.clone(), ENV.s3_region.clone(), ENV.s3_endpoint.clone())?;
    log::info!("Object storage ready (bucket {})", ENV.s3_bucket);
    Ok(Arc::new(storage))
}

pub fn asset_config() -> AssetConfig {
    AssetConfig {
        presign_ttl: Duration::from_secs(ENV.presign_ttl_seconds),
        compensate_partial_uploads: ENV.compensate_partial_uploads,
    }
}
