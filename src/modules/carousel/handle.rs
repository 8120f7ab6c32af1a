use actix_multipart::{form::MultipartForm, Multipart};
use actix_web::{get, patch, post, web, HttpRequest};
use uuid::Uuid;
use validator::Validate;

use crate::api::{error, success};
use crate::middlewares::require_role;
use crate::modules::carousel::{
    model::{CarouselSlideResponse, CreateCarouselSlideForm, UpdateCarouselSlideModel},
    service::CarouselService,
};
use crate::utils::{read_file_part, Role, ValidatedJson};
use crate::ENV;

#[post("/slides/create")]
pub async fn create(
    carousel_service: web::Data<CarouselService>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<CreateCarouselSlideForm>,
) -> Result<success::Success<CarouselSlideResponse>, error::Error> {
    require_role(&req, &[Role::Superadmin])?;

    let (model, image) = form.into_parts();
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;

    let slide = carousel_service.create(model, image).await?;
    Ok(success::Success::created(Some(slide)).message("Carousel slide created successfully"))
}

#[get("/slides/get")]
pub async fn find_all(
    carousel_service: web::Data<CarouselService>,
) -> Result<success::Success<Vec<CarouselSlideResponse>>, error::Error> {
    let slides = carousel_service.get_all().await?;
    Ok(success::Success::ok(Some(slides)))
}

#[get("/slides/get/{id}")]
pub async fn find_one(
    carousel_service: web::Data<CarouselService>,
    id: web::Path<Uuid>,
) -> Result<success::Success<CarouselSlideResponse>, error::Error> {
    let slide = carousel_service.get_by_id(&id).await?;
    Ok(success::Success::ok(Some(slide)))
}

#[patch("/slides/update/{id}")]
pub async fn update(
    carousel_service: web::Data<CarouselService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
    body: ValidatedJson<UpdateCarouselSlideModel>,
) -> Result<success::Success<CarouselSlideResponse>, error::Error> {
    require_role(&req, &[Role::Superadmin])?;
    let slide = carousel_service.update(&id, body.0).await?;
    Ok(success::Success::ok(Some(slide)).message("Carousel slide updated successfully"))
}

#[patch("/slides/update/{id}/image")]
pub async fn update_image(
    carousel_service: web::Data<CarouselService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<success::Success<CarouselSlideResponse>, error::Error> {
    require_role(&req, &[Role::Superadmin])?;
    let image = read_file_part(payload, "image", ENV.max_upload_size).await?;
    let slide = carousel_service.update_image(&id, image).await?;
    Ok(success::Success::ok(Some(slide)).message("File uploaded successfully"))
}

#[patch("/slides/expire/{id}")]
pub async fn expire(
    carousel_service: web::Data<CarouselService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CarouselSlideResponse>, error::Error> {
    require_role(&req, &[Role::Superadmin])?;
    let slide = carousel_service.expire(&id).await?;
    Ok(success::Success::ok(Some(slide)).message("Carousel slide expired"))
}
