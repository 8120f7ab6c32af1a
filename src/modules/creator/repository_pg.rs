use crate::{
    api::error,
    modules::creator::{
        model::UpdateCreator,
        repository::CreatorRepository,
        schema::{CreatorAsset, CreatorEntity},
    },
};

#[derive(Clone)]
pub struct CreatorRepositoryPg {
    pool: sqlx::PgPool,
}

impl CreatorRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CreatorRepository for CreatorRepositoryPg {
    async fn find_all(&self) -> Result<Vec<CreatorEntity>, error::SystemError> {
        let creators = sqlx::query_as::<_, CreatorEntity>(
            r#"
            SELECT * FROM creator
            WHERE deleted_at IS NULL AND verified_at IS NOT NULL
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(creators)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CreatorEntity>, error::SystemError> {
        let creator = sqlx::query_as::<_, CreatorEntity>("SELECT * FROM creator WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(creator)
    }

    async fn update(
        &self,
        slug: &str,
        creator: &UpdateCreator,
    ) -> Result<CreatorEntity, error::SystemError> {
        let creator = sqlx::query_as::<_, CreatorEntity>(
            r#"
            UPDATE creator
            SET
                description = COALESCE($2, description),
                flavor_text = COALESCE($3, flavor_text),
                website     = COALESCE($4, website),
                updated_at  = NOW()
            WHERE slug = $1
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(&creator.description)
        .bind(&creator.flavor_text)
        .bind(&creator.website)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found(format!("Creator {slug} does not exist")))?;

        Ok(creator)
    }

    async fn update_asset(
        &self,
        slug: &str,
        field: CreatorAsset,
        key: &str,
    ) -> Result<CreatorEntity, error::SystemError> {
        // column names come from a closed enum
        let query = format!(
            "UPDATE creator SET {} = $2, updated_at = NOW() WHERE slug = $1 RETURNING *",
            field.as_str()
        );
        let creator = sqlx::query_as::<_, CreatorEntity>(&query)
            .bind(slug)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                error::SystemError::not_found(format!("Creator {slug} does not exist"))
            })?;

        Ok(creator)
    }
}
