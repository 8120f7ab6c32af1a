use uuid::Uuid;

use crate::{
    api::error,
    modules::carousel::{
        model::{NewCarouselSlide, UpdateCarouselSlide},
        schema::CarouselSlideEntity,
    },
};

#[async_trait::async_trait]
pub trait CarouselRepository {
    async fn create(
        &self,
        slide: &NewCarouselSlide,
    ) -> Result<CarouselSlideEntity, error::SystemError>;
    /// Slides that have not expired, highest priority first.
    async fn find_all(&self) -> Result<Vec<CarouselSlideEntity>, error::SystemError>;
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CarouselSlideEntity>, error::SystemError>;
    async fn update(
        &self,
        id: &Uuid,
        slide: &UpdateCarouselSlide,
    ) -> Result<CarouselSlideEntity, error::SystemError>;
    async fn update_image(
        &self,
        id: &Uuid,
        key: &str,
    ) -> Result<CarouselSlideEntity, error::SystemError>;
    async fn expire(&self, id: &Uuid) -> Result<CarouselSlideEntity, error::SystemError>;
}
