use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "carousel_location", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CarouselLocation {
    Home,
}

#[derive(Debug, Clone, FromRow)]
pub struct CarouselSlideEntity {
    pub id: Uuid,
    pub image: String,
    pub priority: i32,
    pub link: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub location: CarouselLocation,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub expired_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
