use uuid::Uuid;

use crate::{
    api::error,
    modules::comic_issue::{
        model::{ComicIssueFilterQuery, NewComicIssue, NewComicPage, UpdateComicIssue},
        repository::ComicIssueRepository,
        schema::{ComicIssueAsset, ComicIssueEntity, ComicPageEntity, IssueContext},
    },
    utils::escape_like,
};

#[derive(Clone)]
pub struct ComicIssueRepositoryPg {
    pool: sqlx::PgPool,
}

impl ComicIssueRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn missing(id: &Uuid) -> error::SystemError {
    error::SystemError::not_found(format!("Comic issue {id} does not exist"))
}

#[async_trait::async_trait]
impl ComicIssueRepository for ComicIssueRepositoryPg {
    async fn create(&self, issue: &NewComicIssue) -> Result<ComicIssueEntity, error::SystemError> {
        let issue = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            INSERT INTO comic_issue (
                id, comic_slug, number, title, slug, description, flavor_text,
                cover, soundtrack, magic_eden, open_sea, release_date, hashlist
            )
            VALUES (
                $1, $2, $3, $4, $5, COALESCE($6, ''), COALESCE($7, ''),
                COALESCE($8, ''), COALESCE($9, ''), COALESCE($10, ''), COALESCE($11, ''),
                $12, $13
            )
            RETURNING *
            "#,
        )
        .bind(issue.id)
        .bind(&issue.comic_slug)
        .bind(issue.number)
        .bind(&issue.title)
        .bind(&issue.slug)
        .bind(&issue.description)
        .bind(&issue.flavor_text)
        .bind(&issue.cover)
        .bind(&issue.soundtrack)
        .bind(&issue.magic_eden)
        .bind(&issue.open_sea)
        .bind(issue.release_date)
        .bind(&issue.hashlist)
        .fetch_one(&self.pool)
        .await?;

        Ok(issue)
    }

    async fn find_all(
        &self,
        filter: &ComicIssueFilterQuery,
    ) -> Result<Vec<ComicIssueEntity>, error::SystemError> {
        let issues = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            SELECT i.* FROM comic_issue i
            JOIN comic c ON c.slug = i.comic_slug
            JOIN creator cr ON cr.id = c.creator_id
            WHERE i.deleted_at IS NULL
              AND i.published_at IS NOT NULL
              AND i.verified_at IS NOT NULL
              AND ($1::text IS NULL OR cr.slug = $1)
              AND ($2::text IS NULL OR i.comic_slug = $2)
              AND ($3::text IS NULL OR i.title ILIKE '%' || $3 || '%' ESCAPE '\')
              AND ($4::text[] IS NULL OR c.genres && $4)
            ORDER BY i.release_date DESC, i.number
            "#,
        )
        .bind(&filter.creator_slug)
        .bind(&filter.comic_slug)
        .bind(filter.title_substring.as_deref().map(escape_like))
        .bind(&filter.genre_slugs)
        .fetch_all(&self.pool)
        .await?;

        Ok(issues)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ComicIssueEntity>, error::SystemError> {
        let issue =
            sqlx::query_as::<_, ComicIssueEntity>("SELECT * FROM comic_issue WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(issue)
    }

    async fn find_by_slug_or_number(
        &self,
        comic_slug: &str,
        slug: &str,
        number: i32,
    ) -> Result<Option<ComicIssueEntity>, error::SystemError> {
        let issue = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            SELECT * FROM comic_issue
            WHERE comic_slug = $1 AND (slug = $2 OR number = $3)
            ORDER BY (slug = $2) DESC
            LIMIT 1
            "#,
        )
        .bind(comic_slug)
        .bind(slug)
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(issue)
    }

    async fn find_context(
        &self,
        comic_slug: &str,
    ) -> Result<Option<IssueContext>, error::SystemError> {
        let context = sqlx::query_as::<_, IssueContext>(
            r#"
            SELECT
                c.name         AS comic_name,
                c.slug         AS comic_slug,
                cr.id          AS creator_id,
                cr.name        AS creator_name,
                cr.slug        AS creator_slug,
                cr.verified_at AS creator_verified_at,
                cr.avatar      AS creator_avatar
            FROM comic c
            JOIN creator cr ON cr.id = c.creator_id
            WHERE c.slug = $1
            "#,
        )
        .bind(comic_slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(context)
    }

    async fn find_pages(&self, id: &Uuid) -> Result<Vec<ComicPageEntity>, error::SystemError> {
        let pages = sqlx::query_as::<_, ComicPageEntity>(
            "SELECT * FROM comic_page WHERE comic_issue_id = $1 ORDER BY page_number",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pages)
    }

    async fn update(
        &self,
        id: &Uuid,
        issue: &UpdateComicIssue,
    ) -> Result<ComicIssueEntity, error::SystemError> {
        let issue = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            UPDATE comic_issue
            SET
                number       = COALESCE($2, number),
                description  = COALESCE($3, description),
                flavor_text  = COALESCE($4, flavor_text),
                magic_eden   = COALESCE($5, magic_eden),
                open_sea     = COALESCE($6, open_sea),
                release_date = COALESCE($7, release_date),
                hashlist     = COALESCE($8, hashlist),
                updated_at   = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(issue.number)
        .bind(&issue.description)
        .bind(&issue.flavor_text)
        .bind(&issue.magic_eden)
        .bind(&issue.open_sea)
        .bind(issue.release_date)
        .bind(&issue.hashlist)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(issue)
    }

    async fn update_asset(
        &self,
        id: &Uuid,
        field: ComicIssueAsset,
        key: &str,
    ) -> Result<ComicIssueEntity, error::SystemError> {
        // column names come from a closed enum
        let query = format!(
            "UPDATE comic_issue SET {} = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            field.as_str()
        );
        let issue = sqlx::query_as::<_, ComicIssueEntity>(&query)
            .bind(id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| missing(id))?;

        Ok(issue)
    }

    async fn set_published(
        &self,
        id: &Uuid,
        published: bool,
    ) -> Result<ComicIssueEntity, error::SystemError> {
        let issue = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            UPDATE comic_issue
            SET published_at = CASE WHEN $2 THEN NOW() ELSE NULL END, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(issue)
    }

    async fn set_deleted(
        &self,
        id: &Uuid,
        deleted: bool,
    ) -> Result<ComicIssueEntity, error::SystemError> {
        let issue = sqlx::query_as::<_, ComicIssueEntity>(
            r#"
            UPDATE comic_issue
            SET deleted_at = CASE WHEN $2 THEN NOW() ELSE NULL END, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(deleted)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing(id))?;

        Ok(issue)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), error::SystemError> {
        let result =
            sqlx::query("DELETE FROM comic_issue WHERE id = $1").bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(missing(id));
        }
        Ok(())
    }

    async fn create_page(
        &self,
        page: &NewComicPage,
    ) -> Result<ComicPageEntity, error::SystemError> {
        let page = sqlx::query_as::<_, ComicPageEntity>(
            r#"
            INSERT INTO comic_page (id, comic_issue_id, page_number, is_preview, image, alt_image)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, ''))
            RETURNING *
            "#,
        )
        .bind(page.id)
        .bind(page.comic_issue_id)
        .bind(page.page_number)
        .bind(page.is_preview)
        .bind(&page.image)
        .bind(&page.alt_image)
        .fetch_one(&self.pool)
        .await?;

        Ok(page)
    }
}
