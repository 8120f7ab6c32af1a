use uuid::Uuid;

use crate::{
    api::error,
    modules::carousel::{
        model::{NewCarouselSlide, UpdateCarouselSlide},
        repository::CarouselRepository,
        schema::CarouselSlideEntity,
    },
};

#[derive(Clone)]
pub struct CarouselRepositoryPg {
    pool: sqlx::PgPool,
}

impl CarouselRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn missing(id: &Uuid) -> error::SystemError {
    error::SystemError::not_found(format!("Carousel slide {id} does not exist"))
}

#[async_trait::async_trait]
impl CarouselRepository for CarouselRepositoryPg {
    async fn create(
        &self,
        slide: &NewCarouselSlide,
    ) -> Result<CarouselSlideEntity, error::SystemError> {
        let slide = sqlx::query_as::<_, CarouselSlideEntity>(
            r#"
            INSERT INTO carousel_slide (id, image, priority, link, title, subtitle, location, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(slide.id)
        .bind(&slide.image)
        .bind(slide.priority)
        .bind(&slide.link)
        .bind(&slide.title)
        .bind(&slide.subtitle)
        .bind(slide.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(slide)
    }

    async fn find_all(&self) -> Result<Vec<CarouselSlideEntity>, error::SystemError> {
        let slides = sqlx::query_as::<_, CarouselSlideEntity>(
            r#"
            SELECT * FROM carousel_slide
            WHERE expired_at IS NULL
            ORDER BY priority DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(slides)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<CarouselSlideEntity>, error::SystemError> {
        let slide =
            sqlx::query_as::<_, CarouselSlideEntity>("SELECT * FROM carousel_slide WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(slide)
    }

    async fn update(
        &self,
        id: &Uuid,
        slide: &UpdateCarouselSlide,
    ) -> Result<CarouselSlideEntity, error::SystemError> {
        let slide = sqlx::query_as::<_, CarouselSlideEntity>(
            r#"
            UPDATE carousel_slide
            SET
                priority = COALESCE($2, priority),
                link     = COALESCE($3, link),
                title    = COALESCE($4, title),
                subtitle = COALESCE($5, subtitle),
                location = COALESCE($6, location)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(slide.priority)
        .bind(&slide.link)
        .bind(&slide.title)
        .bind(&slide.subtitle)
        .bind(slide.location)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(slide)
    }

    async fn update_image(
        &self,
        id: &Uuid,
        key: &str,
    ) -> Result<CarouselSlideEntity, error::SystemError> {
        let slide = sqlx::query_as::<_, CarouselSlideEntity>(
            "UPDATE carousel_slide SET image = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(slide)
    }

    async fn expire(&self, id: &Uuid) -> Result<CarouselSlideEntity, error::SystemError> {
        let slide = sqlx::query_as::<_, CarouselSlideEntity>(
            "UPDATE carousel_slide SET expired_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(slide)
    }
}
