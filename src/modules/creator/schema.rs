use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CreatorEntity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub slug: String,
    pub avatar: String,
    pub banner: String,
    pub logo: String,
    pub description: String,
    pub flavor_text: String,
    pub website: String,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Creator columns that hold object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorAsset {
    Avatar,
    Banner,
    Logo,
}

impl CreatorAsset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorAsset::Avatar => "avatar",
            CreatorAsset::Banner => "banner",
            CreatorAsset::Logo => "logo",
        }
    }
}
