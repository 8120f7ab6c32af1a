use std::sync::Arc;

use crate::api::error;
use crate::assets::{AssetResolver, AssetUploader, UploadIntent};
use crate::modules::comic::{
    model::{
        ComicFilterQuery, ComicResponse, CreateComicModel, NewComic, UpdateComicModel,
        COMIC_ASSETS,
    },
    repository::ComicRepository,
    schema::{ComicAsset, ComicEntity},
};
use crate::modules::comic_issue::model::ComicIssueResponse;
use crate::storage::keys;
use crate::utils::Claims;

#[derive(Clone)]
pub struct ComicService {
    repo: Arc<dyn ComicRepository + Send + Sync>,
    uploader: AssetUploader,
    resolver: AssetResolver,
}

impl ComicService {
    pub fn with_dependencies(
        repo: Arc<dyn ComicRepository + Send + Sync>,
        uploader: AssetUploader,
        resolver: AssetResolver,
    ) -> Self {
        log::info!("ComicService initialized with dependencies");
        ComicService { repo, uploader, resolver }
    }

    pub async fn create(
        &self,
        model: CreateComicModel,
        files: Vec<UploadIntent>,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        let repo = self.repo.clone();
        let creator_id = claims.sub;
        let prefix = keys::comic_prefix(&model.slug);

        let comic = self
            .uploader
            .upload_and_persist(&prefix, files, |assets| async move {
                let comic = NewComic {
                    slug: model.slug,
                    name: model.name,
                    creator_id,
                    is_completed: model.is_completed,
                    is_mature_audience: model.is_mature_audience,
                    cover: assets.key("cover"),
                    pfp: assets.key("pfp"),
                    logo: assets.key("logo"),
                    description: model.description,
                    flavor_text: model.flavor_text,
                    website: model.website,
                    twitter: model.twitter,
                    discord: model.discord,
                    telegram: model.telegram,
                    instagram: model.instagram,
                    tiktok: model.tiktok,
                    youtube: model.youtube,
                    genres: model.genres,
                };
                repo.create(&comic).await
            })
            .await?;

        log::info!("Comic {} created by {}", comic.slug, creator_id);
        self.respond(comic).await
    }

    pub async fn get_all(
        &self,
        filter: &ComicFilterQuery,
    ) -> Result<Vec<ComicResponse>, error::SystemError> {
        let comics = self.repo.find_all(filter).await?;
        let responses = comics.into_iter().map(ComicResponse::from).collect();
        Ok(self.resolver.presign_many(responses, COMIC_ASSETS).await?)
    }

    /// The comic with its issues and a preview of its creator.
    pub async fn get_by_slug(&self, slug: &str) -> Result<ComicResponse, error::SystemError> {
        let comic = self.find_existing(slug).await?;
        let issues = self.repo.find_issues(slug).await?;
        let creator = self.repo.find_creator_preview(&comic.creator_id).await?;

        let mut response = ComicResponse::from(comic);
        response.issues = Some(issues.into_iter().map(ComicIssueResponse::from).collect());
        response.creator = creator;

        Ok(self.resolver.presign_one(response, COMIC_ASSETS).await?)
    }

    pub async fn update(
        &self,
        slug: &str,
        model: UpdateComicModel,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        self.find_owned(slug, claims).await?;
        let updated = self.repo.update(slug, &model.into()).await?;
        self.respond(updated).await
    }

    pub async fn update_file(
        &self,
        slug: &str,
        field: ComicAsset,
        intent: UploadIntent,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        if intent.is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "No valid {} file provided",
                field.as_str()
            )));
        }

        self.find_owned(slug, claims).await?;

        let repo = self.repo.clone();
        let owned_slug = slug.to_string();
        let updated = self
            .uploader
            .upload_and_persist(&keys::comic_prefix(slug), vec![intent], |assets| async move {
                let key = assets.key(field.as_str()).ok_or_else(|| {
                    error::SystemError::bad_request(format!(
                        "No valid {} file provided",
                        field.as_str()
                    ))
                })?;
                repo.update_asset(&owned_slug, field, &key).await
            })
            .await?;

        log::info!("Comic {} replaced its {}", slug, field.as_str());
        self.respond(updated).await
    }

    pub async fn publish(
        &self,
        slug: &str,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        self.find_owned(slug, claims).await?;
        let comic = self.repo.set_published(slug, true).await?;
        self.respond(comic).await
    }

    pub async fn unpublish(
        &self,
        slug: &str,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        self.find_owned(slug, claims).await?;
        let comic = self.repo.set_published(slug, false).await?;
        self.respond(comic).await
    }

    /// Queue the comic for deletion.
    pub async fn pseudo_delete(
        &self,
        slug: &str,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        self.find_owned(slug, claims).await?;
        let comic = self.repo.set_deleted(slug, true).await?;
        self.respond(comic).await
    }

    pub async fn pseudo_recover(
        &self,
        slug: &str,
        claims: &Claims,
    ) -> Result<ComicResponse, error::SystemError> {
        self.find_owned(slug, claims).await?;
        let comic = self.repo.set_deleted(slug, false).await?;
        self.respond(comic).await
    }

    /// Remove every stored asset of the comic and its issues, then the row.
    pub async fn remove(&self, slug: &str, claims: &Claims) -> Result<(), error::SystemError> {
        self.find_owned(slug, claims).await?;

        let removed = self.uploader.remove_all_assets(&keys::comic_prefix(slug)).await?;
        self.repo.delete(slug).await?;

        log::info!("Comic {} removed along with {} asset(s)", slug, removed);
        Ok(())
    }

    async fn find_existing(&self, slug: &str) -> Result<ComicEntity, error::SystemError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("Comic {slug} does not exist")))
    }

    async fn find_owned(
        &self,
        slug: &str,
        claims: &Claims,
    ) -> Result<ComicEntity, error::SystemError> {
        let comic = self.find_existing(slug).await?;
        if comic.creator_id != claims.sub && !claims.is_superadmin() {
            return Err(error::SystemError::forbidden(
                "You don't have permission to edit this comic",
            ));
        }
        Ok(comic)
    }

    async fn respond(&self, comic: ComicEntity) -> Result<ComicResponse, error::SystemError> {
        Ok(self.resolver.presign_one(ComicResponse::from(comic), COMIC_ASSETS).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::Error;
    use crate::assets::AssetConfig;
    use crate::modules::comic::model::UpdateComic;
    use crate::modules::comic_issue::schema::ComicIssueEntity;
    use crate::modules::creator::model::CreatorPreview;
    use crate::storage::mock::MockStorage;
    use crate::storage::ObjectStorage;
    use crate::utils::Role;
    use actix_web::ResponseError;
    use bytes::Bytes;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    #[derive(Default)]
    struct MockComicRepository {
        comics: Mutex<Vec<ComicEntity>>,
        issues: Mutex<Vec<ComicIssueEntity>>,
    }

    impl MockComicRepository {
        fn with(comic: ComicEntity) -> Self {
            let repo = Self::default();
            repo.comics.lock().unwrap().push(comic);
            repo
        }

        fn modify(
            &self,
            slug: &str,
            change: impl FnOnce(&mut ComicEntity),
        ) -> Result<ComicEntity, error::SystemError> {
            let mut comics = self.comics.lock().unwrap();
            let comic = comics
                .iter_mut()
                .find(|c| c.slug == slug)
                .ok_or_else(|| error::SystemError::not_found("missing"))?;
            change(comic);
            Ok(comic.clone())
        }
    }

    #[async_trait::async_trait]
    impl ComicRepository for MockComicRepository {
        async fn create(&self, comic: &NewComic) -> Result<ComicEntity, error::SystemError> {
            let mut comics = self.comics.lock().unwrap();
            if comics.iter().any(|c| c.slug == comic.slug) {
                return Err(error::SystemError::conflict("comic_slug_key"));
            }
            let mut created = ComicEntity::fixture(&comic.slug, comic.creator_id);
            created.name = comic.name.clone();
            created.cover = comic.cover.clone().unwrap_or_default();
            created.pfp = comic.pfp.clone().unwrap_or_default();
            created.logo = comic.logo.clone().unwrap_or_default();
            comics.push(created.clone());
            Ok(created)
        }

        async fn find_all(
            &self,
            _filter: &ComicFilterQuery,
        ) -> Result<Vec<ComicEntity>, error::SystemError> {
            Ok(self.comics.lock().unwrap().clone())
        }

        async fn find_by_slug(
            &self,
            slug: &str,
        ) -> Result<Option<ComicEntity>, error::SystemError> {
            Ok(self.comics.lock().unwrap().iter().find(|c| c.slug == slug).cloned())
        }

        async fn find_issues(
            &self,
            slug: &str,
        ) -> Result<Vec<ComicIssueEntity>, error::SystemError> {
            let issues = self.issues.lock().unwrap();
            Ok(issues.iter().filter(|i| i.comic_slug == slug).cloned().collect())
        }

        async fn find_creator_preview(
            &self,
            _creator_id: &Uuid,
        ) -> Result<Option<CreatorPreview>, error::SystemError> {
            Ok(Some(CreatorPreview {
                name: "Studio".to_string(),
                slug: "studio".to_string(),
                is_verified: true,
                avatar: "creators/studio/avatar.png".to_string(),
            }))
        }

        async fn update(
            &self,
            slug: &str,
            comic: &UpdateComic,
        ) -> Result<ComicEntity, error::SystemError> {
            self.modify(slug, |c| {
                if let Some(description) = &comic.description {
                    c.description = description.clone();
                }
            })
        }

        async fn update_asset(
            &self,
            slug: &str,
            field: ComicAsset,
            key: &str,
        ) -> Result<ComicEntity, error::SystemError> {
            self.modify(slug, |c| match field {
                ComicAsset::Cover => c.cover = key.to_string(),
                ComicAsset::Pfp => c.pfp = key.to_string(),
                ComicAsset::Logo => c.logo = key.to_string(),
            })
        }

        async fn set_published(
            &self,
            slug: &str,
            published: bool,
        ) -> Result<ComicEntity, error::SystemError> {
            self.modify(slug, |c| c.published_at = published.then(chrono::Utc::now))
        }

        async fn set_deleted(
            &self,
            slug: &str,
            deleted: bool,
        ) -> Result<ComicEntity, error::SystemError> {
            self.modify(slug, |c| c.deleted_at = deleted.then(chrono::Utc::now))
        }

        async fn delete(&self, slug: &str) -> Result<(), error::SystemError> {
            self.comics.lock().unwrap().retain(|c| c.slug != slug);
            Ok(())
        }
    }

    fn claims(sub: Uuid, role: Role) -> Claims {
        Claims { sub, iat: 0, exp: u64::MAX, role }
    }

    fn service(repo: MockComicRepository, storage: &Arc<MockStorage>) -> ComicService {
        ComicService::with_dependencies(
            Arc::new(repo),
            AssetUploader::new(storage.clone(), &AssetConfig::default()),
            AssetResolver::new(storage.clone(), Duration::from_secs(60)),
        )
    }

    fn model(name: &str) -> CreateComicModel {
        CreateComicModel {
            slug: crate::utils::kebab_case(name),
            name: name.to_string(),
            is_completed: false,
            is_mature_audience: false,
            description: None,
            flavor_text: None,
            website: None,
            twitter: None,
            discord: None,
            telegram: None,
            instagram: None,
            tiktok: None,
            youtube: None,
            genres: vec!["action".to_string()],
        }
    }

    fn cover() -> UploadIntent {
        UploadIntent::new("cover", Some("cover.png".into()), None, Bytes::from_static(b"png"))
    }

    #[tokio::test]
    async fn create_uploads_and_returns_signed_urls() {
        let storage = Arc::new(MockStorage::new());
        let creator = Uuid::now_v7();

        let comic = service(MockComicRepository::default(), &storage)
            .create(model("Hero Tales"), vec![cover()], &claims(creator, Role::Creator))
            .await
            .unwrap();

        assert_eq!(comic.slug, "hero-tales");
        assert_eq!(comic.cover, MockStorage::signed("comics/hero-tales/cover.png"));
        assert_eq!(comic.pfp, "");
        assert!(storage.has("comics/hero-tales/cover.png"));
    }

    #[tokio::test]
    async fn duplicate_slug_rolls_back_the_cover() {
        let storage = Arc::new(MockStorage::new());
        let creator = Uuid::now_v7();
        let repo = MockComicRepository::with(ComicEntity::fixture("hero-tales", creator));

        let err = service(repo, &storage)
            .create(model("Hero Tales"), vec![cover()], &claims(creator, Role::Creator))
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::Conflict(_)));
        assert_eq!(Error::from(err).status_code(), actix_web::http::StatusCode::CONFLICT);
        assert!(storage.list_keys("comics/hero-tales").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_presigns_issues_and_creator_preview() {
        let storage = Arc::new(MockStorage::new());
        let creator = Uuid::now_v7();
        let mut comic = ComicEntity::fixture("hero-tales", creator);
        comic.logo = "comics/hero-tales/logo.svg".to_string();
        let repo = MockComicRepository::with(comic);
        let mut issue = ComicIssueEntity::fixture("hero-tales", 1);
        issue.cover = "comics/hero-tales/issues/episode-1/cover.jpg".to_string();
        repo.issues.lock().unwrap().push(issue);

        let comic = service(repo, &storage).get_by_slug("hero-tales").await.unwrap();

        assert_eq!(comic.logo, MockStorage::signed("comics/hero-tales/logo.svg"));
        let issues = comic.issues.unwrap();
        assert_eq!(
            issues[0].cover,
            MockStorage::signed("comics/hero-tales/issues/episode-1/cover.jpg")
        );
        assert_eq!(issues[0].soundtrack, "");
        let creator = comic.creator.unwrap();
        assert_eq!(creator.avatar, MockStorage::signed("creators/studio/avatar.png"));
    }

    #[tokio::test]
    async fn other_creators_cannot_replace_files() {
        let storage = Arc::new(MockStorage::new());
        let repo = MockComicRepository::with(ComicEntity::fixture("hero-tales", Uuid::now_v7()));

        let err = service(repo, &storage)
            .update_file(
                "hero-tales",
                ComicAsset::Cover,
                cover(),
                &claims(Uuid::now_v7(), Role::Creator),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::Forbidden(_)));
        assert_eq!(MockStorage::calls(&storage.put_calls), 0);
    }

    #[tokio::test]
    async fn unknown_comic_never_uploads() {
        let storage = Arc::new(MockStorage::new());

        let err = service(MockComicRepository::default(), &storage)
            .update_file("nope", ComicAsset::Pfp, cover(), &claims(Uuid::now_v7(), Role::Superadmin))
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::NotFound(_)));
        assert_eq!(MockStorage::calls(&storage.put_calls), 0);
    }

    #[tokio::test]
    async fn remove_clears_the_whole_comic_folder() {
        let storage = Arc::new(MockStorage::new());
        storage.insert("comics/hero-tales/cover.png", b"x");
        storage.insert("comics/hero-tales/issues/episode-1/cover.png", b"x");
        let creator = Uuid::now_v7();
        let repo = MockComicRepository::with(ComicEntity::fixture("hero-tales", creator));
        let comics = service(repo, &storage);

        comics.remove("hero-tales", &claims(creator, Role::Creator)).await.unwrap();

        assert!(storage.keys().is_empty());
        assert!(matches!(
            comics.get_by_slug("hero-tales").await,
            Err(error::SystemError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn superadmin_can_publish_any_comic() {
        let storage = Arc::new(MockStorage::new());
        let repo = MockComicRepository::with(ComicEntity::fixture("hero-tales", Uuid::now_v7()));

        let comic = service(repo, &storage)
            .publish("hero-tales", &claims(Uuid::now_v7(), Role::Superadmin))
            .await
            .unwrap();

        assert!(comic.is_published);
    }
}
