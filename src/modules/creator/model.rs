use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::assets::{AssetFields, AssetResolver, Presignable};
use crate::modules::creator::schema::CreatorEntity;
use crate::storage::StorageResult;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreatorModel {
    #[validate(length(max = 256, message = "Description must be at most 256 characters long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Flavor text must be at most 128 characters long"))]
    pub flavor_text: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
}

pub struct UpdateCreator {
    pub description: Option<String>,
    pub flavor_text: Option<String>,
    pub website: Option<String>,
}

impl From<UpdateCreatorModel> for UpdateCreator {
    fn from(model: UpdateCreatorModel) -> Self {
        UpdateCreator {
            description: model.description,
            flavor_text: model.flavor_text,
            website: model.website,
        }
    }
}

pub const CREATOR_ASSETS: AssetFields = AssetFields(&["avatar", "banner", "logo"]);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub slug: String,
    pub is_deleted: bool,
    pub is_verified: bool,
    pub avatar: String,
    pub banner: String,
    pub logo: String,
    pub description: String,
    pub flavor_text: String,
    pub website: String,
}

impl From<CreatorEntity> for CreatorResponse {
    fn from(entity: CreatorEntity) -> Self {
        CreatorResponse {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            slug: entity.slug,
            is_deleted: entity.deleted_at.is_some(),
            is_verified: entity.verified_at.is_some(),
            avatar: entity.avatar,
            banner: entity.banner,
            logo: entity.logo,
            description: entity.description,
            flavor_text: entity.flavor_text,
            website: entity.website,
        }
    }
}

impl Presignable for CreatorResponse {
    fn asset_key(&self, field: &str) -> Option<&str> {
        match field {
            "avatar" => Some(&self.avatar),
            "banner" => Some(&self.banner),
            "logo" => Some(&self.logo),
            _ => None,
        }
    }

    fn set_asset_url(&mut self, field: &str, url: String) {
        match field {
            "avatar" => self.avatar = url,
            "banner" => self.banner = url,
            "logo" => self.logo = url,
            _ => {}
        }
    }
}

/// The creator as embedded in comic and issue responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPreview {
    pub name: String,
    pub slug: String,
    pub is_verified: bool,
    pub avatar: String,
}

impl CreatorPreview {
    pub async fn sign_avatar(mut self, resolver: &AssetResolver) -> StorageResult<Self> {
        self.avatar = resolver.presign_key(Some(self.avatar)).await?.unwrap_or_default();
        Ok(self)
    }
}
