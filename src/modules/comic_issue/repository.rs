use uuid::Uuid;

use crate::{
    api::error,
    modules::comic_issue::{
        model::{ComicIssueFilterQuery, NewComicIssue, NewComicPage, UpdateComicIssue},
        schema::{ComicIssueAsset, ComicIssueEntity, ComicPageEntity, IssueContext},
    },
};

#[async_trait::async_trait]
pub trait ComicIssueRepository {
    async fn create(&self, issue: &NewComicIssue) -> Result<ComicIssueEntity, error::SystemError>;
    /// Published, verified issues that are not queued for deletion.
    async fn find_all(
        &self,
        filter: &ComicIssueFilterQuery,
    ) -> Result<Vec<ComicIssueEntity>, error::SystemError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ComicIssueEntity>, error::SystemError>;
    async fn find_by_slug_or_number(
        &self,
        comic_slug: &str,
        slug: &str,
        number: i32,
    ) -> Result<Option<ComicIssueEntity>, error::SystemError>;
    async fn find_context(
        &self,
        comic_slug: &str,
    ) -> Result<Option<IssueContext>, error::SystemError>;
    async fn find_pages(&self, id: &Uuid) -> Result<Vec<ComicPageEntity>, error::SystemError>;
    async fn update(
        &self,
        id: &Uuid,
        issue: &UpdateComicIssue,
    ) -> Result<ComicIssueEntity, error::SystemError>;
    async fn update_asset(
        &self,
        id: &Uuid,
        field: ComicIssueAsset,
        key: &str,
    ) -> Result<ComicIssueEntity, error::SystemError>;
    async fn set_published(
        &self,
        id: &Uuid,
        published: bool,
    ) -> Result<ComicIssueEntity, error::SystemError>;
    async fn set_deleted(
        &self,
        id: &Uuid,
        deleted: bool,
    ) -> Result<ComicIssueEntity, error::SystemError>;
    async fn delete(&self, id: &Uuid) -> Result<(), error::SystemError>;
    async fn create_page(
        &self,
        page: &NewComicPage,
    ) -> Result<ComicPageEntity, error::SystemError>;
}
