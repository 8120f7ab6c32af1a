use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::comic::model::ComicPreview;
use crate::modules::creator::model::CreatorPreview;

#[derive(Debug, Clone, FromRow)]
pub struct ComicIssueEntity {
    pub id: Uuid,
    pub comic_slug: String,
    pub number: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub flavor_text: String,
    pub cover: String,
    pub soundtrack: String,
    pub magic_eden: String,
    pub open_sea: String,
    pub release_date: chrono::DateTime<chrono::Utc>,
    pub hashlist: Vec<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub popularized_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ComicPageEntity {
    pub id: Uuid,
    pub comic_issue_id: Uuid,
    pub page_number: i32,
    pub is_preview: bool,
    pub image: String,
    pub alt_image: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The comic an issue belongs to, joined with that comic's creator.
#[derive(Debug, Clone, FromRow)]
pub struct IssueContext {
    pub comic_name: String,
    pub comic_slug: String,
    pub creator_id: Uuid,
    pub creator_name: String,
    pub creator_slug: String,
    pub creator_verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub creator_avatar: String,
}

impl IssueContext {
    pub fn comic_preview(&self) -> ComicPreview {
        ComicPreview { name: self.comic_name.clone(), slug: self.comic_slug.clone() }
    }

    pub fn creator_preview(&self) -> CreatorPreview {
        CreatorPreview {
            name: self.creator_name.clone(),
            slug: self.creator_slug.clone(),
            is_verified: self.creator_verified_at.is_some(),
            avatar: self.creator_avatar.clone(),
        }
    }
}

/// Issue columns that hold object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComicIssueAsset {
    Cover,
    Soundtrack,
}

impl ComicIssueAsset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComicIssueAsset::Cover => "cover",
            ComicIssueAsset::Soundtrack => "soundtrack",
        }
    }
}

#[cfg(test)]
impl ComicIssueEntity {
    pub fn fixture(comic_slug: &str, number: i32) -> Self {
        let now = chrono::Utc::now();
        ComicIssueEntity {
            id: Uuid::now_v7(),
            comic_slug: comic_slug.to_string(),
            number,
            title: format!("Episode {number}"),
            slug: format!("episode-{number}"),
            description: String::new(),
            flavor_text: String::new(),
            cover: String::new(),
            soundtrack: String::new(),
            magic_eden: String::new(),
            open_sea: String::new(),
            release_date: now,
            hashlist: Vec::new(),
            deleted_at: None,
            verified_at: Some(now),
            published_at: None,
            popularized_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
