use std::sync::Arc;

use crate::api::error;
use crate::assets::{AssetResolver, AssetUploader, UploadIntent};
use crate::modules::creator::{
    model::{CreatorResponse, UpdateCreatorModel, CREATOR_ASSETS},
    repository::CreatorRepository,
    schema::{CreatorAsset, CreatorEntity},
};
use crate::storage::keys;
use crate::utils::Claims;

#[derive(Clone)]
pub struct CreatorService {
    repo: Arc<dyn CreatorRepository + Send + Sync>,
    uploader: AssetUploader,
    resolver: AssetResolver,
}

impl CreatorService {
    pub fn with_dependencies(
        repo: Arc<dyn CreatorRepository + Send + Sync>,
        uploader: AssetUploader,
        resolver: AssetResolver,
    ) -> Self {
        log::info!("CreatorService initialized with dependencies");
        CreatorService { repo, uploader, resolver }
    }

    pub async fn get_all(&self) -> Result<Vec<CreatorResponse>, error::SystemError> {
        let creators = self.repo.find_all().await?;
        let responses = creators.into_iter().map(CreatorResponse::from).collect();
        Ok(self.resolver.presign_many(responses, CREATOR_ASSETS).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CreatorResponse, error::SystemError> {
        let creator = self.find_existing(slug).await?;
        self.respond(creator).await
    }

    pub async fn update(
        &self,
        slug: &str,
        model: UpdateCreatorModel,
        claims: &Claims,
    ) -> Result<CreatorResponse, error::SystemError> {
        let creator = self.find_existing(slug).await?;
        ensure_owner(&creator, claims)?;

        let updated = self.repo.update(slug, &model.into()).await?;
        self.respond(updated).await
    }

    pub async fn update_file(
        &self,
        slug: &str,
        field: CreatorAsset,
        intent: UploadIntent,
        claims: &Claims,
    ) -> Result<CreatorResponse, error::SystemError> {
        if intent.is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "No valid {} file provided",
                field.as_str()
            )));
        }

        let creator = self.find_existing(slug).await?;
        ensure_owner(&creator, claims)?;

        let repo = self.repo.clone();
        let owned_slug = slug.to_string();
        let updated = self
            .uploader
            .upload_and_persist(&keys::creator_prefix(slug), vec![intent], |assets| async move {
                let key = assets.key(field.as_str()).ok_or_else(|| {
                    error::SystemError::bad_request(format!(
                        "No valid {} file provided",
                        field.as_str()
                    ))
                })?;
                repo.update_asset(&owned_slug, field, &key).await
            })
            .await?;

        log::info!("Creator {} replaced its {}", slug, field.as_str());
        self.respond(updated).await
    }

    async fn find_existing(&self, slug: &str) -> Result<CreatorEntity, error::SystemError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("Creator {slug} does not exist")))
    }

    async fn respond(&self, creator: CreatorEntity) -> Result<CreatorResponse, error::SystemError> {
        Ok(self.resolver.presign_one(CreatorResponse::from(creator), CREATOR_ASSETS).await?)
    }
}

fn ensure_owner(creator: &CreatorEntity, claims: &Claims) -> Result<(), error::SystemError> {
    if creator.id == claims.sub || claims.is_superadmin() {
        Ok(())
    } else {
        Err(error::SystemError::forbidden("You don't have permission to edit this creator"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetConfig;
    use crate::modules::creator::model::UpdateCreator;
    use crate::storage::mock::MockStorage;
    use crate::utils::Role;
    use bytes::Bytes;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    struct MockCreatorRepository {
        creators: Mutex<Vec<CreatorEntity>>,
        fail_writes: bool,
    }

    fn creator(slug: &str) -> CreatorEntity {
        let now = chrono::Utc::now();
        CreatorEntity {
            id: Uuid::now_v7(),
            email: format!("{slug}@comics.test"),
            name: slug.to_string(),
            slug: slug.to_string(),
            avatar: format!("creators/{slug}/avatar.png"),
            banner: String::new(),
            logo: String::new(),
            description: String::new(),
            flavor_text: String::new(),
            website: String::new(),
            deleted_at: None,
            verified_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    impl MockCreatorRepository {
        fn with(creators: Vec<CreatorEntity>) -> Self {
            Self { creators: Mutex::new(creators), fail_writes: false }
        }

        fn modify(
            &self,
            slug: &str,
            change: impl FnOnce(&mut CreatorEntity),
        ) -> Result<CreatorEntity, error::SystemError> {
            if self.fail_writes {
                return Err(error::SystemError::DatabaseError("connection reset".into()));
            }
            let mut creators = self.creators.lock().unwrap();
            let creator = creators
                .iter_mut()
                .find(|c| c.slug == slug)
                .ok_or_else(|| error::SystemError::not_found("missing"))?;
            change(creator);
            Ok(creator.clone())
        }
    }

    #[async_trait::async_trait]
    impl CreatorRepository for MockCreatorRepository {
        async fn find_all(&self) -> Result<Vec<CreatorEntity>, error::SystemError> {
            Ok(self.creators.lock().unwrap().clone())
        }

        async fn find_by_slug(
            &self,
            slug: &str,
        ) -> Result<Option<CreatorEntity>, error::SystemError> {
            Ok(self.creators.lock().unwrap().iter().find(|c| c.slug == slug).cloned())
        }

        async fn update(
            &self,
            slug: &str,
            creator: &UpdateCreator,
        ) -> Result<CreatorEntity, error::SystemError> {
            self.modify(slug, |c| {
                if let Some(description) = &creator.description {
                    c.description = description.clone();
                }
            })
        }

        async fn update_asset(
            &self,
            slug: &str,
            field: CreatorAsset,
            key: &str,
        ) -> Result<CreatorEntity, error::SystemError> {
            self.modify(slug, |c| match field {
                CreatorAsset::Avatar => c.avatar = key.to_string(),
                CreatorAsset::Banner => c.banner = key.to_string(),
                CreatorAsset::Logo => c.logo = key.to_string(),
            })
        }
    }

    fn service(repo: MockCreatorRepository, storage: &Arc<MockStorage>) -> CreatorService {
        CreatorService::with_dependencies(
            Arc::new(repo),
            AssetUploader::new(storage.clone(), &AssetConfig::default()),
            AssetResolver::new(storage.clone(), Duration::from_secs(60)),
        )
    }

    fn claims(sub: Uuid, role: Role) -> Claims {
        Claims { sub, iat: 0, exp: u64::MAX, role }
    }

    fn banner() -> UploadIntent {
        UploadIntent::new("banner", Some("wide.JPG".into()), None, Bytes::from_static(b"jpg"))
    }

    #[tokio::test]
    async fn listing_signs_set_assets_and_skips_empty_ones() {
        let storage = Arc::new(MockStorage::new());
        let repo = MockCreatorRepository::with(vec![creator("studio"), creator("atelier")]);

        let creators = service(repo, &storage).get_all().await.unwrap();

        assert_eq!(creators[0].slug, "studio");
        assert_eq!(creators[0].avatar, MockStorage::signed("creators/studio/avatar.png"));
        assert_eq!(creators[1].avatar, MockStorage::signed("creators/atelier/avatar.png"));
        assert_eq!(creators[1].banner, "");
        assert_eq!(MockStorage::calls(&storage.read_url_calls), 2);
    }

    #[tokio::test]
    async fn owner_replaces_the_banner() {
        let storage = Arc::new(MockStorage::new());
        let studio = creator("studio");
        let owner = studio.id;

        let updated = service(MockCreatorRepository::with(vec![studio]), &storage)
            .update_file("studio", CreatorAsset::Banner, banner(), &claims(owner, Role::Creator))
            .await
            .unwrap();

        assert!(storage.has("creators/studio/banner.jpg"));
        assert_eq!(updated.banner, MockStorage::signed("creators/studio/banner.jpg"));
    }

    #[tokio::test]
    async fn failed_write_rolls_back_the_new_banner() {
        let storage = Arc::new(MockStorage::new());
        let studio = creator("studio");
        let owner = studio.id;
        let repo = MockCreatorRepository { creators: Mutex::new(vec![studio]), fail_writes: true };

        let err = service(repo, &storage)
            .update_file("studio", CreatorAsset::Banner, banner(), &claims(owner, Role::Creator))
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::DatabaseError(_)));
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn strangers_cannot_edit_a_creator() {
        let storage = Arc::new(MockStorage::new());
        let repo = MockCreatorRepository::with(vec![creator("studio")]);

        let err = service(repo, &storage)
            .update_file("studio", CreatorAsset::Logo, banner(), &claims(Uuid::now_v7(), Role::User))
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::Forbidden(_)));
        assert_eq!(MockStorage::calls(&storage.put_calls), 0);
    }

    #[tokio::test]
    async fn unknown_creator_is_not_found() {
        let storage = Arc::new(MockStorage::new());

        let err = service(MockCreatorRepository::with(Vec::new()), &storage)
            .get_by_slug("ghost")
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::NotFound(_)));
    }
}
