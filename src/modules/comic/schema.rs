use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ComicEntity {
    pub slug: String,
    pub name: String,
    pub creator_id: Uuid,
    pub is_completed: bool,
    pub is_mature_audience: bool,
    pub cover: String,
    pub pfp: String,
    pub logo: String,
    pub description: String,
    pub flavor_text: String,
    pub website: String,
    pub twitter: String,
    pub discord: String,
    pub telegram: String,
    pub instagram: String,
    pub tiktok: String,
    pub youtube: String,
    pub genres: Vec<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub popularized_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Comic columns that hold object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComicAsset {
    Cover,
    Pfp,
    Logo,
}

impl ComicAsset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComicAsset::Cover => "cover",
            ComicAsset::Pfp => "pfp",
            ComicAsset::Logo => "logo",
        }
    }
}

#[cfg(test)]
impl ComicEntity {
    pub fn fixture(slug: &str, creator_id: Uuid) -> Self {
        let now = chrono::Utc::now();
        ComicEntity {
            slug: slug.to_string(),
            name: slug.to_string(),
            creator_id,
            is_completed: false,
            is_mature_audience: false,
            cover: String::new(),
            pfp: String::new(),
            logo: String::new(),
            description: String::new(),
            flavor_text: String::new(),
            website: String::new(),
            twitter: String::new(),
            discord: String::new(),
            telegram: String::new(),
            instagram: String::new(),
            tiktok: String::new(),
            youtube: String::new(),
            genres: Vec::new(),
            deleted_at: None,
            verified_at: Some(now),
            published_at: None,
            popularized_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
