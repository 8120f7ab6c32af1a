use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::assets::{AssetFields, Presignable, UploadIntent};
use crate::modules::carousel::schema::{CarouselLocation, CarouselSlideEntity};
use crate::utils::file_intent;

#[derive(MultipartForm)]
pub struct CreateCarouselSlideForm {
    pub image: Bytes,
    pub priority: Option<Text<i32>>,
    pub link: Text<String>,
    pub title: Option<Text<String>>,
    pub subtitle: Option<Text<String>>,
    pub location: Option<Text<CarouselLocation>>,
}

impl CreateCarouselSlideForm {
    pub fn into_parts(self) -> (CreateCarouselSlideModel, Option<UploadIntent>) {
        let model = CreateCarouselSlideModel {
            priority: self.priority.map_or(0, Text::into_inner),
            link: self.link.into_inner(),
            title: self.title.map(Text::into_inner).filter(|t| !t.is_empty()),
            subtitle: self.subtitle.map(Text::into_inner).filter(|s| !s.is_empty()),
            location: self.location.map_or(CarouselLocation::Home, Text::into_inner),
        };

        (model, file_intent("image", Some(self.image)))
    }
}

#[derive(Debug, Validate)]
pub struct CreateCarouselSlideModel {
    #[validate(range(min = 0, message = "Priority must not be negative"))]
    pub priority: i32,
    #[validate(length(min = 1, message = "Link must not be empty"))]
    pub link: String,
    #[validate(length(max = 64, message = "Title must be at most 64 characters long"))]
    pub title: Option<String>,
    #[validate(length(max = 128, message = "Subtitle must be at most 128 characters long"))]
    pub subtitle: Option<String>,
    pub location: CarouselLocation,
}

pub struct NewCarouselSlide {
    pub id: Uuid,
    pub image: String,
    pub priority: i32,
    pub link: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub location: CarouselLocation,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarouselSlideModel {
    #[validate(range(min = 0, message = "Priority must not be negative"))]
    pub priority: Option<i32>,
    #[validate(length(min = 1, message = "Link must not be empty"))]
    pub link: Option<String>,
    #[validate(length(max = 64, message = "Title must be at most 64 characters long"))]
    pub title: Option<String>,
    #[validate(length(max = 128, message = "Subtitle must be at most 128 characters long"))]
    pub subtitle: Option<String>,
    pub location: Option<CarouselLocation>,
}

pub struct UpdateCarouselSlide {
    pub priority: Option<i32>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub location: Option<CarouselLocation>,
}

impl From<UpdateCarouselSlideModel> for UpdateCarouselSlide {
    fn from(model: UpdateCarouselSlideModel) -> Self {
        UpdateCarouselSlide {
            priority: model.priority,
            link: model.link,
            title: model.title,
            subtitle: model.subtitle,
            location: model.location,
        }
    }
}

pub const CAROUSEL_SLIDE_ASSETS: AssetFields = AssetFields(&["image"]);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSlideResponse {
    pub id: Uuid,
    pub image: String,
    pub priority: i32,
    pub link: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub is_published: bool,
    pub is_expired: bool,
    pub location: CarouselLocation,
}

impl From<CarouselSlideEntity> for CarouselSlideResponse {
    fn from(entity: CarouselSlideEntity) -> Self {
        CarouselSlideResponse {
            id: entity.id,
            image: entity.image,
            priority: entity.priority,
            link: entity.link,
            title: entity.title,
            subtitle: entity.subtitle,
            is_published: entity.published_at.is_some(),
            is_expired: entity.expired_at.is_some(),
            location: entity.location,
        }
    }
}

impl Presignable for CarouselSlideResponse {
    fn asset_key(&self, field: &str) -> Option<&str> {
        (field == "image").then_some(self.image.as_str())
    }

    fn set_asset_url(&mut self, field: &str, url: String) {
        if field == "image" {
            self.image = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_uses_the_database_spelling() {
        assert_eq!(serde_json::to_string(&CarouselLocation::Home).unwrap(), r#""HOME""#);
        let parsed: UpdateCarouselSlideModel =
            serde_json::from_str(r#"{"location":"HOME","priority":2}"#).unwrap();
        assert_eq!(parsed.location, Some(CarouselLocation::Home));
    }

    #[test]
    fn negative_priority_is_rejected() {
        let model: UpdateCarouselSlideModel = serde_json::from_str(r#"{"priority":-1}"#).unwrap();
        assert!(model.validate().is_err());
    }
}
