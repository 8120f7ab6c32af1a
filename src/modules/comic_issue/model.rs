use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::assets::{AssetFields, AssetResolver, Presignable, UploadIntent};
use crate::modules::comic::model::ComicPreview;
use crate::modules::comic_issue::schema::{ComicIssueEntity, ComicPageEntity};
use crate::modules::creator::model::CreatorPreview;
use crate::storage::StorageResult;
use crate::utils::{comma_separated, file_intent, is_kebab_case, kebab_case, split_list};

#[derive(MultipartForm)]
pub struct CreateComicIssueForm {
    pub title: Text<String>,
    pub number: Text<i32>,
    #[multipart(rename = "comicSlug")]
    pub comic_slug: Text<String>,
    #[multipart(rename = "releaseDate")]
    pub release_date: Text<chrono::DateTime<chrono::Utc>>,
    pub description: Option<Text<String>>,
    #[multipart(rename = "flavorText")]
    pub flavor_text: Option<Text<String>>,
    #[multipart(rename = "magicEden")]
    pub magic_eden: Option<Text<String>>,
    #[multipart(rename = "openSea")]
    pub open_sea: Option<Text<String>>,
    pub hashlist: Option<Text<String>>,
    pub cover: Option<Bytes>,
    pub soundtrack: Option<Bytes>,
}

impl CreateComicIssueForm {
    pub fn into_parts(self) -> (CreateComicIssueModel, Vec<UploadIntent>) {
        let title = self.title.into_inner();
        let model = CreateComicIssueModel {
            slug: kebab_case(&title),
            title,
            number: self.number.into_inner(),
            comic_slug: self.comic_slug.into_inner(),
            release_date: self.release_date.into_inner(),
            description: self.description.map(Text::into_inner),
            flavor_text: self.flavor_text.map(Text::into_inner),
            magic_eden: self.magic_eden.map(Text::into_inner).filter(|v| !v.is_empty()),
            open_sea: self.open_sea.map(Text::into_inner).filter(|v| !v.is_empty()),
            hashlist: self.hashlist.map(|h| split_list(&h)).unwrap_or_default(),
        };

        let files = [file_intent("cover", self.cover), file_intent("soundtrack", self.soundtrack)]
            .into_iter()
            .flatten()
            .collect();

        (model, files)
    }
}

#[derive(Debug, Validate)]
pub struct CreateComicIssueModel {
    #[validate(length(min = 1, max = 54, message = "Title must be between 1 and 54 characters long"))]
    pub title: String,
    #[validate(custom(function = "is_kebab_case", message = "Title must contain letters or digits"))]
    pub slug: String,
    #[validate(range(min = 1, message = "Number must be positive"))]
    pub number: i32,
    #[validate(custom(function = "is_kebab_case", message = "Comic slug must be kebab-case"))]
    pub comic_slug: String,
    pub release_date: chrono::DateTime<chrono::Utc>,
    #[validate(length(max = 256, message = "Description must be at most 256 characters long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Flavor text must be at most 128 characters long"))]
    pub flavor_text: Option<String>,
    #[validate(url(message = "Magic Eden link must be a valid URL"))]
    pub magic_eden: Option<String>,
    #[validate(url(message = "OpenSea link must be a valid URL"))]
    pub open_sea: Option<String>,
    pub hashlist: Vec<String>,
}

pub struct NewComicIssue {
    pub id: Uuid,
    pub comic_slug: String,
    pub number: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub flavor_text: Option<String>,
    pub cover: Option<String>,
    pub soundtrack: Option<String>,
    pub magic_eden: Option<String>,
    pub open_sea: Option<String>,
    pub release_date: chrono::DateTime<chrono::Utc>,
    pub hashlist: Vec<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComicIssueModel {
    #[validate(range(min = 1, message = "Number must be positive"))]
    pub number: Option<i32>,
    #[validate(length(max = 256, message = "Description must be at most 256 characters long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "Flavor text must be at most 128 characters long"))]
    pub flavor_text: Option<String>,
    #[validate(url(message = "Magic Eden link must be a valid URL"))]
    pub magic_eden: Option<String>,
    #[validate(url(message = "OpenSea link must be a valid URL"))]
    pub open_sea: Option<String>,
    pub release_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "comma_separated")]
    pub hashlist: Option<Vec<String>>,
}

pub struct UpdateComicIssue {
    pub number: Option<i32>,
    pub description: Option<String>,
    pub flavor_text: Option<String>,
    pub magic_eden: Option<String>,
    pub open_sea: Option<String>,
    pub release_date: Option<chrono::DateTime<chrono::Utc>>,
    pub hashlist: Option<Vec<String>>,
}

impl From<UpdateComicIssueModel> for UpdateComicIssue {
    fn from(model: UpdateComicIssueModel) -> Self {
        UpdateComicIssue {
            number: model.number,
            description: model.description,
            flavor_text: model.flavor_text,
            magic_eden: model.magic_eden,
            open_sea: model.open_sea,
            release_date: model.release_date,
            hashlist: model.hashlist,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComicIssueFilterQuery {
    #[validate(custom(function = "is_kebab_case", message = "Creator slug must be kebab-case"))]
    pub creator_slug: Option<String>,
    pub comic_slug: Option<String>,
    pub title_substring: Option<String>,
    #[serde(default, deserialize_with = "comma_separated")]
    pub genre_slugs: Option<Vec<String>>,
}

#[derive(MultipartForm)]
pub struct CreateComicPageForm {
    #[multipart(rename = "pageNumber")]
    pub page_number: Text<i32>,
    #[multipart(rename = "isPreview")]
    pub is_preview: Option<Text<bool>>,
    pub image: Bytes,
    #[multipart(rename = "altImage")]
    pub alt_image: Option<Bytes>,
}

impl CreateComicPageForm {
    pub fn into_parts(self) -> (CreateComicPageModel, Vec<UploadIntent>) {
        let model = CreateComicPageModel {
            page_number: self.page_number.into_inner(),
            is_preview: self.is_preview.is_some_and(|v| v.into_inner()),
        };

        let files = [file_intent("image", Some(self.image)), file_intent("alt_image", self.alt_image)]
            .into_iter()
            .flatten()
            .collect();

        (model, files)
    }
}

#[derive(Debug, Validate)]
pub struct CreateComicPageModel {
    #[validate(range(min = 1, message = "Page number must be positive"))]
    pub page_number: i32,
    pub is_preview: bool,
}

pub struct NewComicPage {
    pub id: Uuid,
    pub comic_issue_id: Uuid,
    pub page_number: i32,
    pub is_preview: bool,
    pub image: String,
    pub alt_image: Option<String>,
}

pub const COMIC_PAGE_ASSETS: AssetFields = AssetFields(&["image", "alt_image"]);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicPageResponse {
    pub id: Uuid,
    pub page_number: i32,
    pub is_preview: bool,
    pub image: String,
    pub alt_image: String,
}

impl From<ComicPageEntity> for ComicPageResponse {
    fn from(entity: ComicPageEntity) -> Self {
        ComicPageResponse {
            id: entity.id,
            page_number: entity.page_number,
            is_preview: entity.is_preview,
            image: entity.image,
            alt_image: entity.alt_image,
        }
    }
}

impl Presignable for ComicPageResponse {
    fn asset_key(&self, field: &str) -> Option<&str> {
        match field {
            "image" => Some(&self.image),
            "alt_image" => Some(&self.alt_image),
            _ => None,
        }
    }

    fn set_asset_url(&mut self, field: &str, url: String) {
        match field {
            "image" => self.image = url,
            "alt_image" => self.alt_image = url,
            _ => {}
        }
    }
}

pub const COMIC_ISSUE_ASSETS: AssetFields = AssetFields(&["cover", "soundtrack"]);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicIssueResponse {
    pub id: Uuid,
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
    pub is_published: bool,
    pub is_popular: bool,
    pub is_deleted: bool,
    pub is_verified: bool,
    pub comic_slug: String,
    pub hashlist: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comic: Option<ComicPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<ComicPageResponse>>,
}

impl From<ComicIssueEntity> for ComicIssueResponse {
    fn from(entity: ComicIssueEntity) -> Self {
        ComicIssueResponse {
            id: entity.id,
            number: entity.number,
            title: entity.title,
            slug: entity.slug,
            description: entity.description,
            flavor_text: entity.flavor_text,
            cover: entity.cover,
            soundtrack: entity.soundtrack,
            magic_eden: entity.magic_eden,
            open_sea: entity.open_sea,
            release_date: entity.release_date,
            is_published: entity.published_at.is_some(),
            is_popular: entity.popularized_at.is_some(),
            is_deleted: entity.deleted_at.is_some(),
            is_verified: entity.verified_at.is_some(),
            comic_slug: entity.comic_slug,
            hashlist: entity.hashlist,
            comic: None,
            creator: None,
            pages: None,
        }
    }
}

#[async_trait::async_trait]
impl Presignable for ComicIssueResponse {
    fn asset_key(&self, field: &str) -> Option<&str> {
        match field {
            "cover" => Some(&self.cover),
            "soundtrack" => Some(&self.soundtrack),
            _ => None,
        }
    }

    fn set_asset_url(&mut self, field: &str, url: String) {
        match field {
            "cover" => self.cover = url,
            "soundtrack" => self.soundtrack = url,
            _ => {}
        }
    }

    async fn presign_nested(&mut self, resolver: &AssetResolver) -> StorageResult<()> {
        if let Some(pages) = self.pages.take() {
            self.pages = Some(resolver.presign_many(pages, COMIC_PAGE_ASSETS).await?);
        }
        if let Some(creator) = self.creator.take() {
            self.creator = Some(creator.sign_avatar(resolver).await?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_form_derives_the_slug_and_splits_the_hashlist() {
        let form = CreateComicIssueForm {
            title: Text("The Beginning".to_string()),
            number: Text(1),
            comic_slug: Text("hero-tales".to_string()),
            release_date: Text(chrono::Utc::now()),
            description: None,
            flavor_text: None,
            magic_eden: Some(Text(String::new())),
            open_sea: None,
            hashlist: Some(Text("mintA, mintB".to_string())),
            cover: None,
            soundtrack: None,
        };

        let (model, files) = form.into_parts();

        assert_eq!(model.slug, "the-beginning");
        assert_eq!(model.magic_eden, None);
        assert_eq!(model.hashlist, vec!["mintA", "mintB"]);
        assert!(files.is_empty());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn page_numbers_start_at_one() {
        let model = CreateComicPageModel { page_number: 0, is_preview: false };
        assert!(model.validate().is_err());
    }

    #[test]
    fn update_accepts_a_joined_hashlist() {
        let model: UpdateComicIssueModel =
            serde_json::from_str(r#"{"number":2,"hashlist":"a,b"}"#).unwrap();
        assert_eq!(model.hashlist.unwrap(), vec!["a", "b"]);
        assert_eq!(model.number, Some(2));
    }
}
