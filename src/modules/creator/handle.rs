use actix_multipart::Multipart;
use actix_web::{get, patch, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::creator::{
    model::{CreatorResponse, UpdateCreatorModel},
    schema::CreatorAsset,
    service::CreatorService,
};
use crate::utils::{read_file_part, ValidatedJson};
use crate::ENV;

#[get("/get")]
pub async fn find_all(
    creator_service: web::Data<CreatorService>,
) -> Result<success::Success<Vec<CreatorResponse>>, error::Error> {
    let creators = creator_service.get_all().await?;
    Ok(success::Success::ok(Some(creators)))
}

#[get("/get/{slug}")]
pub async fn find_one(
    creator_service: web::Data<CreatorService>,
    slug: web::Path<String>,
) -> Result<success::Success<CreatorResponse>, error::Error> {
    let creator = creator_service.get_by_slug(&slug).await?;
    Ok(success::Success::ok(Some(creator)))
}

#[patch("/update/{slug}")]
pub async fn update(
    creator_service: web::Data<CreatorService>,
    slug: web::Path<String>,
    req: HttpRequest,
    body: ValidatedJson<UpdateCreatorModel>,
) -> Result<success::Success<CreatorResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let creator = creator_service.update(&slug, body.0, &claims).await?;
    Ok(success::Success::ok(Some(creator)).message("Creator updated successfully"))
}

#[patch("/update/{slug}/{field}")]
pub async fn update_file(
    creator_service: web::Data<CreatorService>,
    path: web::Path<(String, CreatorAsset)>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<success::Success<CreatorResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let (slug, field) = path.into_inner();
    let intent = read_file_part(payload, field.as_str(), ENV.max_upload_size).await?;
    let creator = creator_service.update_file(&slug, field, intent, &claims).await?;
    Ok(success::Success::ok(Some(creator)).message("File uploaded successfully"))
}
