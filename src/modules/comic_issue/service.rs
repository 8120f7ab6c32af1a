use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::assets::{AssetResolver, AssetUploader, UploadIntent};
use crate::modules::comic_issue::{
    model::{
        ComicIssueFilterQuery, ComicIssueResponse, ComicPageResponse, CreateComicIssueModel,
        CreateComicPageModel, NewComicIssue, NewComicPage, UpdateComicIssueModel,
        COMIC_ISSUE_ASSETS, COMIC_PAGE_ASSETS,
    },
    repository::ComicIssueRepository,
    schema::{ComicIssueAsset, ComicIssueEntity, IssueContext},
};
use crate::storage::keys;
use crate::utils::Claims;

#[derive(Clone)]
pub struct ComicIssueService {
    repo: Arc<dyn ComicIssueRepository + Send + Sync>,
    uploader: AssetUploader,
    resolver: AssetResolver,
}

impl ComicIssueService {
    pub fn with_dependencies(
        repo: Arc<dyn ComicIssueRepository + Send + Sync>,
        uploader: AssetUploader,
        resolver: AssetResolver,
    ) -> Self {
        log::info!("ComicIssueService initialized with dependencies");
        ComicIssueService { repo, uploader, resolver }
    }

    pub async fn create(
        &self,
        model: CreateComicIssueModel,
        files: Vec<UploadIntent>,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        let context = self.find_context(&model.comic_slug).await?;
        ensure_owner(&context, claims)?;
        self.ensure_vacant(&model).await?;

        let repo = self.repo.clone();
        let prefix = keys::issue_prefix(&model.comic_slug, &model.slug);

        let issue = self
            .uploader
            .upload_and_persist(&prefix, files, |assets| async move {
                let issue = NewComicIssue {
                    id: Uuid::now_v7(),
                    comic_slug: model.comic_slug,
                    number: model.number,
                    title: model.title,
                    slug: model.slug,
                    description: model.description,
                    flavor_text: model.flavor_text,
                    cover: assets.key("cover"),
                    soundtrack: assets.key("soundtrack"),
                    magic_eden: model.magic_eden,
                    open_sea: model.open_sea,
                    release_date: model.release_date,
                    hashlist: model.hashlist,
                };
                repo.create(&issue).await
            })
            .await?;

        log::info!("Comic issue {} created in {}", issue.id, issue.comic_slug);
        self.respond(issue).await
    }

    pub async fn get_all(
        &self,
        filter: &ComicIssueFilterQuery,
    ) -> Result<Vec<ComicIssueResponse>, error::SystemError> {
        let issues = self.repo.find_all(filter).await?;
        let responses = issues.into_iter().map(ComicIssueResponse::from).collect();
        Ok(self.resolver.presign_many(responses, COMIC_ISSUE_ASSETS).await?)
    }

    /// The issue with its pages and previews of its comic and creator.
    pub async fn get_by_id(&self, id: &Uuid) -> Result<ComicIssueResponse, error::SystemError> {
        let issue = self.find_existing(id).await?;
        let context = self.repo.find_context(&issue.comic_slug).await?;
        let pages = self.repo.find_pages(id).await?;

        let mut response = ComicIssueResponse::from(issue);
        response.pages = Some(pages.into_iter().map(ComicPageResponse::from).collect());
        if let Some(context) = context {
            response.comic = Some(context.comic_preview());
            response.creator = Some(context.creator_preview());
        }

        Ok(self.resolver.presign_one(response, COMIC_ISSUE_ASSETS).await?)
    }

    pub async fn update(
        &self,
        id: &Uuid,
        model: UpdateComicIssueModel,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        self.find_owned(id, claims).await?;
        let updated = self.repo.update(id, &model.into()).await?;
        self.respond(updated).await
    }

    pub async fn update_file(
        &self,
        id: &Uuid,
        field: ComicIssueAsset,
        intent: UploadIntent,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        if intent.is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "No valid {} file provided",
                field.as_str()
            )));
        }

        let issue = self.find_owned(id, claims).await?;

        let repo = self.repo.clone();
        let issue_id = issue.id;
        let updated = self
            .uploader
            .upload_and_persist(&issue_prefix(&issue), vec![intent], |assets| async move {
                let key = assets.key(field.as_str()).ok_or_else(|| {
                    error::SystemError::bad_request(format!(
                        "No valid {} file provided",
                        field.as_str()
                    ))
                })?;
                repo.update_asset(&issue_id, field, &key).await
            })
            .await?;

        log::info!("Comic issue {} replaced its {}", id, field.as_str());
        self.respond(updated).await
    }

    pub async fn publish(
        &self,
        id: &Uuid,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        self.find_owned(id, claims).await?;
        let issue = self.repo.set_published(id, true).await?;
        self.respond(issue).await
    }

    pub async fn unpublish(
        &self,
        id: &Uuid,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        self.find_owned(id, claims).await?;
        let issue = self.repo.set_published(id, false).await?;
        self.respond(issue).await
    }

    /// Queue the issue for deletion.
    pub async fn pseudo_delete(
        &self,
        id: &Uuid,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        self.find_owned(id, claims).await?;
        let issue = self.repo.set_deleted(id, true).await?;
        self.respond(issue).await
    }

    pub async fn pseudo_recover(
        &self,
        id: &Uuid,
        claims: &Claims,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        self.find_owned(id, claims).await?;
        let issue = self.repo.set_deleted(id, false).await?;
        self.respond(issue).await
    }

    /// Remove every stored asset of the issue and its pages, then the row.
    pub async fn remove(&self, id: &Uuid, claims: &Claims) -> Result<(), error::SystemError> {
        let issue = self.find_owned(id, claims).await?;

        let removed = self.uploader.remove_all_assets(&issue_prefix(&issue)).await?;
        self.repo.delete(id).await?;

        log::info!("Comic issue {} removed along with {} asset(s)", id, removed);
        Ok(())
    }

    pub async fn add_page(
        &self,
        id: &Uuid,
        model: CreateComicPageModel,
        files: Vec<UploadIntent>,
        claims: &Claims,
    ) -> Result<ComicPageResponse, error::SystemError> {
        if !files.iter().any(|file| file.field == "image") {
            return Err(error::SystemError::bad_request("No valid image file provided"));
        }

        let issue = self.find_owned(id, claims).await?;

        let repo = self.repo.clone();
        let issue_id = issue.id;
        let page_id = Uuid::now_v7();
        let prefix = keys::page_prefix(&issue_prefix(&issue), &page_id);

        let page = self
            .uploader
            .upload_and_persist(&prefix, files, |assets| async move {
                let image = assets.key("image").ok_or_else(|| {
                    error::SystemError::bad_request("No valid image file provided")
                })?;
                let page = NewComicPage {
                    id: page_id,
                    comic_issue_id: issue_id,
                    page_number: model.page_number,
                    is_preview: model.is_preview,
                    image,
                    alt_image: assets.key("alt_image"),
                };
                repo.create_page(&page).await
            })
            .await?;

        log::info!("Page {} added to comic issue {}", page.page_number, id);
        Ok(self.resolver.presign_one(ComicPageResponse::from(page), COMIC_PAGE_ASSETS).await?)
    }

    async fn find_existing(&self, id: &Uuid) -> Result<ComicIssueEntity, error::SystemError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("Comic issue {id} does not exist"))
        })
    }

    async fn find_context(&self, comic_slug: &str) -> Result<IssueContext, error::SystemError> {
        self.repo.find_context(comic_slug).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("Comic {comic_slug} does not exist"))
        })
    }

    /// Issue keys derive from the slug, so a taken slug or number must be
    /// rejected before anything is written under it.
    async fn ensure_vacant(
        &self,
        model: &CreateComicIssueModel,
    ) -> Result<(), error::SystemError> {
        let taken = self
            .repo
            .find_by_slug_or_number(&model.comic_slug, &model.slug, model.number)
            .await?;

        match taken {
            Some(issue) if issue.slug == model.slug => {
                Err(error::SystemError::conflict("comic_issue_slug_key"))
            }
            Some(_) => Err(error::SystemError::conflict("comic_issue_number_key")),
            None => Ok(()),
        }
    }

    async fn find_owned(
        &self,
        id: &Uuid,
        claims: &Claims,
    ) -> Result<ComicIssueEntity, error::SystemError> {
        let issue = self.find_existing(id).await?;
        let context = self.find_context(&issue.comic_slug).await?;
        ensure_owner(&context, claims)?;
        Ok(issue)
    }

    async fn respond(
        &self,
        issue: ComicIssueEntity,
    ) -> Result<ComicIssueResponse, error::SystemError> {
        Ok(self.resolver.presign_one(ComicIssueResponse::from(issue), COMIC_ISSUE_ASSETS).await?)
    }
}

fn issue_prefix(issue: &ComicIssueEntity) -> String {
    keys::issue_prefix(&issue.comic_slug, &issue.slug)
}

fn ensure_owner(context: &IssueContext, claims: &Claims) -> Result<(), error::SystemError> {
    if context.creator_id == claims.sub || claims.is_superadmin() {
        Ok(())
    } else {
        Err(error::SystemError::forbidden("You don't have permission to edit this comic"))
    }
}
