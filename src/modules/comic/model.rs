use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::assets::{AssetFields, AssetResolver, Presignable, UploadIntent};
use crate::modules::comic::schema::ComicEntity;
use crate::modules::comic_issue::model::{ComicIssueResponse, COMIC_ISSUE_ASSETS};
use crate::modules::creator::model::CreatorPreview;
use crate::storage::StorageResult;
use crate::utils::{comma_separated, file_intent, is_kebab_case, kebab_case, split_list};

#[derive(MultipartForm)]
pub struct CreateComicForm {
    pub name: Text<String>,
    #[multipart(rename = "isCompleted")]
    pub is_completed: Option<Text<bool>>,
    #[multipart(rename = "isMatureAudience")]
    pub is_mature_audience: Option<Text<bool>>,
    pub description: Option<Text<String>>,
    #[multipart(rename = "flavorText")]
    pub flavor_text: Option<Text<String>>,
    pub website: Option<Text<String>>,
    pub twitter: Option<Text<String>>,
    pub discord: Option<Text<String>>,
    pub telegram: Option<Text<String>>,
    pub instagram: Option<Text<String>>,
    pub tiktok: Option<Text<String>>,
    pub youtube: Option<Text<String>>,
    pub genres: Option<Text<String>>,
    pub cover: Option<Bytes>,
    pub pfp: Option<Bytes>,
    pub logo: Option<Bytes>,
}

impl CreateComicForm {
    /// Split the form into its validated fields and the files to upload.
    pub fn into_parts(self) -> (CreateComicModel, Vec<UploadIntent>) {
        let name = self.name.into_inner();
        let model = CreateComicModel {
            slug: kebab_case(&name),
            name,
            is_completed: self.is_completed.is_some_and(|v| v.into_inner()),
            is_mature_audience: self.is_mature_audience.is_some_and(|v| v.into_inner()),
            description: self.description.map(Text::into_inner),
            flavor_text: self.flavor_text.map(Text::into_inner),
            website: non_empty(self.website),
            twitter: non_empty(self.twitter),
            discord: non_empty(self.discord),
            telegram: non_empty(self.telegram),
            instagram: non_empty(self.instagram),
            tiktok: non_empty(self.tiktok),
            youtube: non_empty(self.youtube),
            genres: self.genres.map(|g| split_list(&g)).unwrap_or_default(),
        };

        let files = [
            file_intent("cover", self.cover),
            file_intent("pfp", self.pfp),
            file_intent("logo", self.logo),
        ]
        .into_iter()
        .flatten()
        .collect();

        (model, files)
    }
}

fn non_empty(value: Option<Text<String>>) -> Option<String> {
    value.map(Text::into_inner).filter(|v| !v.is_empty())
}

#[derive(Debug, Validate)]
pub struct CreateComicModel {
    #[validate(length(min = 1, max = 48, message = "Name must be between 1 and 48 characters long"))]
    pub name: String,
    #[validate(custom(function = "is_kebab_case", message = "Name must contain letters or digits"))]
    pub slug: String,
    pub is_completed: bool,
    pub is_mature_audience: bool,
    #[validate(length(max = 256, message = "Description must be at most 256 characters long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Flavor text must be at most 128 characters long"))]
    pub flavor_text: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(url(message = "Twitter must be a valid URL"))]
    pub twitter: Option<String>,
    #[validate(url(message = "Discord must be a valid URL"))]
    pub discord: Option<String>,
    #[validate(url(message = "Telegram must be a valid URL"))]
    pub telegram: Option<String>,
    #[validate(url(message = "Instagram must be a valid URL"))]
    pub instagram: Option<String>,
    #[validate(url(message = "TikTok must be a valid URL"))]
    pub tiktok: Option<String>,
    #[validate(url(message = "YouTube must be a valid URL"))]
    pub youtube: Option<String>,
    pub genres: Vec<String>,
}

/// A comic row to insert, with the keys of the files uploaded for it.
pub struct NewComic {
    pub slug: String,
    pub name: String,
    pub creator_id: Uuid,
    pub is_completed: bool,
    pub is_mature_audience: bool,
    pub cover: Option<String>,
    pub pfp: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub flavor_text: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub telegram: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub genres: Vec<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComicModel {
    pub is_completed: Option<bool>,
    pub is_mature_audience: Option<bool>,
    #[validate(length(max = 256, message = "Description must be at most 256 characters long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Flavor text must be at most 128 characters long"))]
    pub flavor_text: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(url(message = "Twitter must be a valid URL"))]
    pub twitter: Option<String>,
    #[validate(url(message = "Discord must be a valid URL"))]
    pub discord: Option<String>,
    #[validate(url(message = "Telegram must be a valid URL"))]
    pub telegram: Option<String>,
    #[validate(url(message = "Instagram must be a valid URL"))]
    pub instagram: Option<String>,
    #[validate(url(message = "TikTok must be a valid URL"))]
    pub tiktok: Option<String>,
    #[validate(url(message = "YouTube must be a valid URL"))]
    pub youtube: Option<String>,
    #[serde(default, deserialize_with = "comma_separated")]
    pub genres: Option<Vec<String>>,
}

pub struct UpdateComic {
    pub is_completed: Option<bool>,
    pub is_mature_audience: Option<bool>,
    pub description: Option<String>,
    pub flavor_text: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub telegram: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl From<UpdateComicModel> for UpdateComic {
    fn from(model: UpdateComicModel) -> Self {
        UpdateComic {
            is_completed: model.is_completed,
            is_mature_audience: model.is_mature_audience,
            description: model.description,
            flavor_text: model.flavor_text,
            website: model.website,
            twitter: model.twitter,
            discord: model.discord,
            telegram: model.telegram,
            instagram: model.instagram,
            tiktok: model.tiktok,
            youtube: model.youtube,
            genres: model.genres,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComicFilterQuery {
    #[validate(custom(function = "is_kebab_case", message = "Creator slug must be kebab-case"))]
    pub creator_slug: Option<String>,
    pub name_substring: Option<String>,
    #[serde(default, deserialize_with = "comma_separated")]
    pub genre_slugs: Option<Vec<String>>,
}

pub const COMIC_ASSETS: AssetFields = AssetFields(&["cover", "pfp", "logo"]);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicResponse {
    pub name: String,
    pub slug: String,
    pub is_completed: bool,
    pub is_mature_audience: bool,
    pub is_deleted: bool,
    pub is_verified: bool,
    pub is_published: bool,
    pub is_popular: bool,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ComicIssueResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorPreview>,
}

impl From<ComicEntity> for ComicResponse {
    fn from(entity: ComicEntity) -> Self {
        ComicResponse {
            name: entity.name,
            slug: entity.slug,
            is_completed: entity.is_completed,
            is_mature_audience: entity.is_mature_audience,
            is_deleted: entity.deleted_at.is_some(),
            is_verified: entity.verified_at.is_some(),
            is_published: entity.published_at.is_some(),
            is_popular: entity.popularized_at.is_some(),
            cover: entity.cover,
            pfp: entity.pfp,
            logo: entity.logo,
            description: entity.description,
            flavor_text: entity.flavor_text,
            website: entity.website,
            twitter: entity.twitter,
            discord: entity.discord,
            telegram: entity.telegram,
            instagram: entity.instagram,
            tiktok: entity.tiktok,
            youtube: entity.youtube,
            genres: entity.genres,
            issues: None,
            creator: None,
        }
    }
}

#[async_trait::async_trait]
impl Presignable for ComicResponse {
    fn asset_key(&self, field: &str) -> Option<&str> {
        match field {
            "cover" => Some(&self.cover),
            "pfp" => Some(&self.pfp),
            "logo" => Some(&self.logo),
            _ => None,
        }
    }

    fn set_asset_url(&mut self, field: &str, url: String) {
        match field {
            "cover" => self.cover = url,
            "pfp" => self.pfp = url,
            "logo" => self.logo = url,
            _ => {}
        }
    }

    async fn presign_nested(&mut self, resolver: &AssetResolver) -> StorageResult<()> {
        if let Some(issues) = self.issues.take() {
            self.issues = Some(resolver.presign_many(issues, COMIC_ISSUE_ASSETS).await?);
        }
        if let Some(creator) = self.creator.take() {
            self.creator = Some(creator.sign_avatar(resolver).await?);
        }
        Ok(())
    }
}

/// The comic as embedded in issue responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComicPreview {
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<Text<String>> {
        Some(Text(value.to_string()))
    }

    fn form(name: &str) -> CreateComicForm {
        CreateComicForm {
            name: Text(name.to_string()),
            is_completed: None,
            is_mature_audience: Some(Text(true)),
            description: None,
            flavor_text: None,
            website: text(""),
            twitter: text("https://twitter.com/herotales"),
            discord: None,
            telegram: None,
            instagram: None,
            tiktok: None,
            youtube: None,
            genres: text("action,sci-fi"),
            cover: None,
            pfp: None,
            logo: None,
        }
    }

    #[test]
    fn form_derives_the_slug_from_the_name() {
        let (model, files) = form("Hero Tales").into_parts();

        assert_eq!(model.slug, "hero-tales");
        assert!(!model.is_completed);
        assert!(model.is_mature_audience);
        assert_eq!(model.website, None);
        assert_eq!(model.genres, vec!["action", "sci-fi"]);
        assert!(files.is_empty());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn names_without_letters_or_digits_are_rejected() {
        let (model, _) = form("!!!").into_parts();
        assert!(model.validate().is_err());
    }

    #[test]
    fn malformed_social_links_are_rejected() {
        let mut bad = form("Hero Tales");
        bad.discord = text("not a url");
        let (model, _) = bad.into_parts();
        assert!(model.validate().is_err());
    }
}
