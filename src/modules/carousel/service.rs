use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::assets::{AssetResolver, AssetUploader, UploadIntent};
use crate::modules::carousel::{
    model::{
        CarouselSlideResponse, CreateCarouselSlideModel, NewCarouselSlide,
        UpdateCarouselSlideModel, CAROUSEL_SLIDE_ASSETS,
    },
    repository::CarouselRepository,
    schema::CarouselSlideEntity,
};
use crate::storage::keys;

#[derive(Clone)]
pub struct CarouselService {
    repo: Arc<dyn CarouselRepository + Send + Sync>,
    uploader: AssetUploader,
    resolver: AssetResolver,
}

impl CarouselService {
    pub fn with_dependencies(
        repo: Arc<dyn CarouselRepository + Send + Sync>,
        uploader: AssetUploader,
        resolver: AssetResolver,
    ) -> Self {
        log::info!("CarouselService initialized with dependencies");
        CarouselService { repo, uploader, resolver }
    }

    pub async fn create(
        &self,
        model: CreateCarouselSlideModel,
        image: Option<UploadIntent>,
    ) -> Result<CarouselSlideResponse, error::SystemError> {
        let image = image
            .filter(|image| !image.is_empty())
            .ok_or_else(|| error::SystemError::bad_request("No valid image file provided"))?;

        let id = Uuid::now_v7();
        let repo = self.repo.clone();

        let slide = self
            .uploader
            .upload_and_persist(&keys::slide_prefix(&id), vec![image], |assets| async move {
                let image = assets.key("image").ok_or_else(|| {
                    error::SystemError::bad_request("No valid image file provided")
                })?;
                let slide = NewCarouselSlide {
                    id,
                    image,
                    priority: model.priority,
                    link: model.link,
                    title: model.title,
                    subtitle: model.subtitle,
                    location: model.location,
                };
                repo.create(&slide).await
            })
            .await?;

        log::info!("Carousel slide {} created", slide.id);
        self.respond(slide).await
    }

    pub async fn get_all(&self) -> Result<Vec<CarouselSlideResponse>, error::SystemError> {
        let slides = self.repo.find_all().await?;
        let responses = slides.into_iter().map(CarouselSlideResponse::from).collect();
        Ok(self.resolver.presign_many(responses, CAROUSEL_SLIDE_ASSETS).await?)
    }

    pub async fn get_by_id(&self, id: &Uuid) -> Result<CarouselSlideResponse, error::SystemError> {
        let slide = self.find_existing(id).await?;
        self.respond(slide).await
    }

    pub async fn update(
        &self,
        id: &Uuid,
        model: UpdateCarouselSlideModel,
    ) -> Result<CarouselSlideResponse, error::SystemError> {
        let slide = self.repo.update(id, &model.into()).await?;
        self.respond(slide).await
    }

    pub async fn update_image(
        &self,
        id: &Uuid,
        image: UploadIntent,
    ) -> Result<CarouselSlideResponse, error::SystemError> {
        if image.is_empty() {
            return Err(error::SystemError::bad_request("No valid image file provided"));
        }

        self.find_existing(id).await?;

        let repo = self.repo.clone();
        let slide_id = *id;
        let slide = self
            .uploader
            .upload_and_persist(&keys::slide_prefix(id), vec![image], |assets| async move {
                let key = assets.key("image").ok_or_else(|| {
                    error::SystemError::bad_request("No valid image file provided")
                })?;
                repo.update_image(&slide_id, &key).await
            })
            .await?;

        self.respond(slide).await
    }

    pub async fn expire(&self, id: &Uuid) -> Result<CarouselSlideResponse, error::SystemError> {
        let slide = self.repo.expire(id).await?;
        log::info!("Carousel slide {} expired", id);
        self.respond(slide).await
    }

    async fn find_existing(&self, id: &Uuid) -> Result<CarouselSlideEntity, error::SystemError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("Carousel slide {id} does not exist"))
        })
    }

    async fn respond(
        &self,
        slide: CarouselSlideEntity,
    ) -> Result<CarouselSlideResponse, error::SystemError> {
        Ok(self
            .resolver
            .presign_one(CarouselSlideResponse::from(slide), CAROUSEL_SLIDE_ASSETS)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetConfig;
    use crate::modules::carousel::model::UpdateCarouselSlide;
    use crate::modules::carousel::schema::CarouselLocation;
    use crate::storage::mock::MockStorage;
    use bytes::Bytes;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MockCarouselRepository {
        slides: Mutex<Vec<CarouselSlideEntity>>,
        fail_writes: bool,
    }

    impl MockCarouselRepository {
        fn modify(
            &self,
            id: &Uuid,
            change: impl FnOnce(&mut CarouselSlideEntity),
        ) -> Result<CarouselSlideEntity, error::SystemError> {
            if self.fail_writes {
                return Err(error::SystemError::DatabaseError("connection reset".into()));
            }
            let mut slides = self.slides.lock().unwrap();
            let slide = slides
                .iter_mut()
                .find(|s| s.id == *id)
                .ok_or_else(|| error::SystemError::not_found("missing"))?;
            change(slide);
            Ok(slide.clone())
        }
    }

    #[async_trait::async_trait]
    impl CarouselRepository for MockCarouselRepository {
        async fn create(
            &self,
            slide: &NewCarouselSlide,
        ) -> Result<CarouselSlideEntity, error::SystemError> {
            if self.fail_writes {
                return Err(error::SystemError::DatabaseError("connection reset".into()));
            }
            let created = CarouselSlideEntity {
                id: slide.id,
                image: slide.image.clone(),
                priority: slide.priority,
                link: slide.link.clone(),
                title: slide.title.clone(),
                subtitle: slide.subtitle.clone(),
                location: slide.location,
                published_at: Some(chrono::Utc::now()),
                expired_at: None,
                created_at: chrono::Utc::now(),
            };
            self.slides.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn find_all(&self) -> Result<Vec<CarouselSlideEntity>, error::SystemError> {
            let slides = self.slides.lock().unwrap();
            Ok(slides.iter().filter(|s| s.expired_at.is_none()).cloned().collect())
        }

        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<CarouselSlideEntity>, error::SystemError> {
            Ok(self.slides.lock().unwrap().iter().find(|s| s.id == *id).cloned())
        }

        async fn update(
            &self,
            id: &Uuid,
            slide: &UpdateCarouselSlide,
        ) -> Result<CarouselSlideEntity, error::SystemError> {
            self.modify(id, |s| {
                if let Some(priority) = slide.priority {
                    s.priority = priority;
                }
            })
        }

        async fn update_image(
            &self,
            id: &Uuid,
            key: &str,
        ) -> Result<CarouselSlideEntity, error::SystemError> {
            self.modify(id, |s| s.image = key.to_string())
        }

        async fn expire(&self, id: &Uuid) -> Result<CarouselSlideEntity, error::SystemError> {
            self.modify(id, |s| s.expired_at = Some(chrono::Utc::now()))
        }
    }

    fn service(repo: MockCarouselRepository, storage: &Arc<MockStorage>) -> CarouselService {
        CarouselService::with_dependencies(
            Arc::new(repo),
            AssetUploader::new(storage.clone(), &AssetConfig::default()),
            AssetResolver::new(storage.clone(), Duration::from_secs(60)),
        )
    }

    fn model() -> CreateCarouselSlideModel {
        CreateCarouselSlideModel {
            priority: 1,
            link: "/comics/hero-tales".to_string(),
            title: Some("Hero Tales".to_string()),
            subtitle: None,
            location: CarouselLocation::Home,
        }
    }

    fn image() -> UploadIntent {
        UploadIntent::new("image", Some("slide.webp".into()), None, Bytes::from_static(b"webp"))
    }

    #[tokio::test]
    async fn slides_require_an_image() {
        let storage = Arc::new(MockStorage::new());

        let err = service(MockCarouselRepository::default(), &storage)
            .create(model(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::BadRequest(_)));
        assert_eq!(MockStorage::calls(&storage.put_calls), 0);
    }

    #[tokio::test]
    async fn created_slide_lives_under_its_own_id() {
        let storage = Arc::new(MockStorage::new());

        let slide = service(MockCarouselRepository::default(), &storage)
            .create(model(), Some(image()))
            .await
            .unwrap();

        let key = format!("carousel/slides/{}/image.webp", slide.id);
        assert!(storage.has(&key));
        assert_eq!(slide.image, MockStorage::signed(&key));
        assert!(slide.is_published);
    }

    #[tokio::test]
    async fn failed_insert_removes_the_image() {
        let storage = Arc::new(MockStorage::new());
        let repo = MockCarouselRepository { fail_writes: true, ..Default::default() };

        let err = service(repo, &storage).create(model(), Some(image())).await.unwrap_err();

        assert!(matches!(err, error::SystemError::DatabaseError(_)));
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn expired_slides_leave_the_listing() {
        let storage = Arc::new(MockStorage::new());
        let carousel = service(MockCarouselRepository::default(), &storage);
        let first = carousel.create(model(), Some(image())).await.unwrap();
        carousel.create(model(), Some(image())).await.unwrap();

        let expired = carousel.expire(&first.id).await.unwrap();
        let listing = carousel.get_all().await.unwrap();

        assert!(expired.is_expired);
        assert_eq!(listing.len(), 1);
        assert_ne!(listing[0].id, first.id);
    }

    #[tokio::test]
    async fn presign_failure_fails_the_listing() {
        let storage = Arc::new(MockStorage::new());
        let carousel = service(MockCarouselRepository::default(), &storage);
        carousel.create(model(), Some(image())).await.unwrap();
        storage.fail_presign_on("carousel/slides");

        let err = carousel.get_all().await.unwrap_err();

        assert!(matches!(err, error::SystemError::StorageError(_)));
    }
}
