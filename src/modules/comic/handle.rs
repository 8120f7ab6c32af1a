use actix_multipart::{form::MultipartForm, Multipart};
use actix_web::{delete, get, patch, post, web, HttpRequest};
use validator::Validate;

use crate::api::{error, success};
use crate::middlewares::{get_claims, require_role};
use crate::modules::comic::{
    model::{ComicFilterQuery, ComicResponse, CreateComicForm, UpdateComicModel},
    schema::ComicAsset,
    service::ComicService,
};
use crate::utils::{read_file_part, Role, ValidatedJson, ValidatedQuery};
use crate::ENV;

#[post("/create")]
pub async fn create(
    comic_service: web::Data<ComicService>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<CreateComicForm>,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = require_role(&req, &[Role::Creator])?;

    let (model, files) = form.into_parts();
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;

    let comic = comic_service.create(model, files, &claims).await?;
    Ok(success::Success::created(Some(comic)).message("Comic created successfully"))
}

#[get("/get")]
pub async fn find_all(
    comic_service: web::Data<ComicService>,
    query: ValidatedQuery<ComicFilterQuery>,
) -> Result<success::Success<Vec<ComicResponse>>, error::Error> {
    let comics = comic_service.get_all(&query.0).await?;
    Ok(success::Success::ok(Some(comics)))
}

#[get("/get/{slug}")]
pub async fn find_one(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let comic = comic_service.get_by_slug(&slug).await?;
    Ok(success::Success::ok(Some(comic)))
}

#[patch("/update/{slug}")]
pub async fn update(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
    body: ValidatedJson<UpdateComicModel>,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let comic = comic_service.update(&slug, body.0, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("Comic updated successfully"))
}

#[patch("/update/{slug}/{field}")]
pub async fn update_file(
    comic_service: web::Data<ComicService>,
    path: web::Path<(String, ComicAsset)>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let (slug, field) = path.into_inner();
    let intent = read_file_part(payload, field.as_str(), ENV.max_upload_size).await?;
    let comic = comic_service.update_file(&slug, field, intent, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("File uploaded successfully"))
}

#[patch("/publish/{slug}")]
pub async fn publish(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let comic = comic_service.publish(&slug, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("Comic published"))
}

#[patch("/unpublish/{slug}")]
pub async fn unpublish(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let comic = comic_service.unpublish(&slug, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("Comic unpublished"))
}

#[patch("/delete/{slug}")]
pub async fn pseudo_delete(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let comic = comic_service.pseudo_delete(&slug, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("Comic queued for deletion"))
}

#[patch("/recover/{slug}")]
pub async fn pseudo_recover(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<ComicResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let comic = comic_service.pseudo_recover(&slug, &claims).await?;
    Ok(success::Success::ok(Some(comic)).message("Comic recovered"))
}

#[delete("/remove/{slug}")]
pub async fn remove(
    comic_service: web::Data<ComicService>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    comic_service.remove(&slug, &claims).await?;
    Ok(success::Success::no_content())
}
