use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comic::{
            model::{ComicFilterQuery, NewComic, UpdateComic},
            repository::ComicRepository,
            schema::{ComicAsset, ComicEntity},
        },
        comic_issue::schema::ComicIssueEntity,
        creator::model::CreatorPreview,
    },
    utils::escape_like,
};

#[derive(Clone)]
pub struct ComicRepositoryPg {
    pool: sqlx::PgPool,
}

impl ComicRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CreatorPreviewRow {
    name: String,
    slug: String,
    verified_at: Option<chrono::DateTime<chrono::Utc>>,
    avatar: String,
}

impl From<CreatorPreviewRow> for CreatorPreview {
    fn from(row: CreatorPreviewRow) -> Self {
        CreatorPreview {
            name: row.name,
            slug: row.slug,
            is_verified: row.verified_at.is_some(),
            avatar: row.avatar,
        }
    }
}

fn missing(slug: &str) -> error::SystemError {
    error::SystemError::not_found(format!("Comic {slug} does not exist"))
}

#[async_trait::async_trait]
impl ComicRepository for ComicRepositoryPg {
    async fn create(&self, comic: &NewComic) -> Result<ComicEntity, error::SystemError> {
        let comic = sqlx::query_as::<_, ComicEntity>(
            r#"
            INSERT INTO comic (
                slug, name, creator_id, is_completed, is_mature_audience,
                cover, pfp, logo, description, flavor_text,
                website, twitter, discord, telegram, instagram, tiktok, youtube, genres
            )
            VALUES (
                $1, $2, $3, $4, $5,
                COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, ''),
                COALESCE($9, ''), COALESCE($10, ''),
                COALESCE($11, ''), COALESCE($12, ''), COALESCE($13, ''), COALESCE($14, ''),
                COALESCE($15, ''), COALESCE($16, ''), COALESCE($17, ''), $18
            )
            RETURNING *
            "#,
        )
        .bind(&comic.slug)
        .bind(&comic.name)
        .bind(comic.creator_id)
        .bind(comic.is_completed)
        .bind(comic.is_mature_audience)
        .bind(&comic.cover)
        .bind(&comic.pfp)
        .bind(&comic.logo)
        .bind(&comic.description)
        .bind(&comic.flavor_text)
        .bind(&comic.website)
        .bind(&comic.twitter)
        .bind(&comic.discord)
        .bind(&comic.telegram)
        .bind(&comic.instagram)
        .bind(&comic.tiktok)
        .bind(&comic.youtube)
        .bind(&comic.genres)
        .fetch_one(&self.pool)
        .await?;

        Ok(comic)
    }

    async fn find_all(
        &self,
        filter: &ComicFilterQuery,
    ) -> Result<Vec<ComicEntity>, error::SystemError> {
        let comics = sqlx::query_as::<_, ComicEntity>(
            r#"
            SELECT c.* FROM comic c
            JOIN creator cr ON cr.id = c.creator_id
            WHERE c.deleted_at IS NULL
              AND c.published_at IS NOT NULL
              AND c.verified_at IS NOT NULL
              AND ($1::text IS NULL OR cr.slug = $1)
              AND ($2::text IS NULL OR c.name ILIKE '%' || $2 || '%' ESCAPE '\')
              AND ($3::text[] IS NULL OR c.genres && $3)
            ORDER BY c.name
            "#,
        )
        .bind(&filter.creator_slug)
        .bind(filter.name_substring.as_deref().map(escape_like))
        .bind(&filter.genre_slugs)
        .fetch_all(&self.pool)
        .await?;

        Ok(comics)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ComicEntity>, error::SystemError> {
        let comic = sqlx::query_as::<_, ComicEntity>("SELECT * FROM comic WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comic)
    }

    async fn find_issues(&self, slug: &str) -> Result<Vec<ComicIssueEntity>, error::SystemError> {
        let issues = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            SELECT * FROM comic_issue
            WHERE comic_slug = $1 AND deleted_at IS NULL
            ORDER BY number
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;
        Ok(issues)
    }

    async fn find_creator_preview(
        &self,
        creator_id: &Uuid,
    ) -> Result<Option<CreatorPreview>, error::SystemError> {
        let creator = sqlx::query_as::<_, CreatorPreviewRow>(
            "SELECT name, slug, verified_at, avatar FROM creator WHERE id = $1",
        )
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(creator.map(CreatorPreview::from))
    }

    async fn update(
        &self,
        slug: &str,
        comic: &UpdateComic,
    ) -> Result<ComicEntity, error::SystemError> {
        let comic = sqlx::query_as::<_, ComicEntity>(
            r#"
            UPDATE comic
            SET
                is_completed       = COALESCE($2, is_completed),
                is_mature_audience = COALESCE($3, is_mature_audience),
                description        = COALESCE($4, description),
                flavor_text        = COALESCE($5, flavor_text),
                website            = COALESCE($6, website),
                twitter            = COALESCE($7, twitter),
                discord            = COALESCE($8, discord),
                telegram           = COALESCE($9, telegram),
                instagram          = COALESCE($10, instagram),
                tiktok             = COALESCE($11, tiktok),
                youtube            = COALESCE($12, youtube),
                genres             = COALESCE($13, genres),
                updated_at         = NOW()
            WHERE slug = $1
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(comic.is_completed)
        .bind(comic.is_mature_audience)
        .bind(&comic.description)
        .bind(&comic.flavor_text)
        .bind(&comic.website)
        .bind(&comic.twitter)
        .bind(&comic.discord)
        .bind(&comic.telegram)
        .bind(&comic.instagram)
        .bind(&comic.tiktok)
        .bind(&comic.youtube)
        .bind(&comic.genres)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(slug))?;

        Ok(comic)
    }

    async fn update_asset(
        &self,
        slug: &str,
        field: ComicAsset,
        key: &str,
    ) -> Result<ComicEntity, error::SystemError> {
        // column names come from a closed enum
        let query = format!(
            "UPDATE comic SET {} = $2, updated_at = NOW() WHERE slug = $1 RETURNING *",
            field.as_str()
        );
        let comic = sqlx::query_as::<_, ComicEntity>(&query)
            .bind(slug)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| missing(slug))?;

        Ok(comic)
    }

    async fn set_published(
        &self,
        slug: &str,
        published: bool,
    ) -> Result<ComicEntity, error::SystemError> {
        let comic = sqlx::query_as::<_, ComicEntity>(
            r#"
            UPDATE comic
            SET published_at = CASE WHEN $2 THEN NOW() ELSE NULL END, updated_at = NOW()
            WHERE slug = $1
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(slug))?;

        Ok(comic)
    }

    async fn set_deleted(
        &self,
        slug: &str,
        deleted: bool,
    ) -> Result<ComicEntity, error::SystemError> {
        let comic = sqlx::query_as::<_, ComicEntity>(
            r#"
            UPDATE comic
            SET deleted_at = CASE WHEN $2 THEN NOW() ELSE NULL END, updated_at = NOW()
            WHERE slug = $1
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(deleted)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(slug))?;

        Ok(comic)
    }

    async fn delete(&self, slug: &str) -> Result<(), error::SystemError> {
        let result = sqlx::query("DELETE FROM comic WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(missing(slug));
        }
        Ok(())
    }
}
