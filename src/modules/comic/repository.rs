use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comic::{
            model::{ComicFilterQuery, NewComic, UpdateComic},
            schema::{ComicAsset, ComicEntity},
        },
        comic_issue::schema::ComicIssueEntity,
        creator::model::CreatorPreview,
    },
};

#[async_trait::async_trait]
pub trait ComicRepository {
    async fn create(&self, comic: &NewComic) -> Result<ComicEntity, error::SystemError>;
    /// Published, verified comics that are not queued for deletion.
    async fn find_all(
        &self,
        filter: &ComicFilterQuery,
    ) -> Result<Vec<ComicEntity>, error::SystemError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ComicEntity>, error::SystemError>;
    async fn find_issues(&self, slug: &str) -> Result<Vec<ComicIssueEntity>, error::SystemError>;
    async fn find_creator_preview(
        &self,
        creator_id: &Uuid,
    ) -> Result<Option<CreatorPreview>, error::SystemError>;
    async fn update(
        &self,
        slug: &str,
        comic: &UpdateComic,
    ) -> Result<ComicEntity, error::SystemError>;
    async fn update_asset(
        &self,
        slug: &str,
        field: ComicAsset,
        key: &str,
    ) -> Result<ComicEntity, error::SystemError>;
    async fn set_published(
        &self,
        slug: &str,
        published: bool,
    ) -> Result<ComicEntity, error::SystemError>;
    async fn set_deleted(
        &self,
        slug: &str,
        deleted: bool,
    ) -> Result<ComicEntity, error::SystemError>;
    async fn delete(&self, slug: &str) -> Result<(), error::SystemError>;
}
