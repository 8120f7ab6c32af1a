use crate::{
    api::error,
    modules::creator::{
        model::UpdateCreator,
        schema::{CreatorAsset, CreatorEntity},
    },
};

#[async_trait::async_trait]
pub trait CreatorRepository {
    /// Verified creators that are not queued for deletion.
    async fn find_all(&self) -> Result<Vec<CreatorEntity>, error::SystemError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CreatorEntity>, error::SystemError>;
    async fn update(
        &self,
        slug: &str,
        creator: &UpdateCreator,
    ) -> Result<CreatorEntity, error::SystemError>;
    async fn update_asset(
        &self,
        slug: &str,
        field: CreatorAsset,
        key: &str,
    ) -> Result<CreatorEntity, error::SystemError>;
}
