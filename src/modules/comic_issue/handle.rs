use actix_multipart::{form::MultipartForm, Multipart};
use actix_web::{delete, get, patch, post, web, HttpRequest};
use uuid::Uuid;
use validator::Validate;

use crate::api::{error, success};
use crate::middlewares::{get_claims, require_role};
use crate::modules::comic_issue::{
    model::{
        ComicIssueFilterQuery, ComicIssueResponse, ComicPageResponse, CreateComicIssueForm,
        CreateComicPageForm, UpdateComicIssueModel,
    },
    schema::ComicIssueAsset,
    service::ComicIssueService,
};
use crate::utils::{read_file_part, Role, ValidatedJson, ValidatedQuery};
use crate::ENV;

#[post("/create")]
pub async fn create(
    comic_issue_service: web::Data<ComicIssueService>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<CreateComicIssueForm>,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = require_role(&req, &[Role::Creator, Role::Superadmin])?;

    let (model, files) = form.into_parts();
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;

    let issue = comic_issue_service.create(model, files, &claims).await?;
    Ok(success::Success::created(Some(issue)).message("Comic issue created successfully"))
}

#[get("/get")]
pub async fn find_all(
    comic_issue_service: web::Data<ComicIssueService>,
    query: ValidatedQuery<ComicIssueFilterQuery>,
) -> Result<success::Success<Vec<ComicIssueResponse>>, error::Error> {
    let issues = comic_issue_service.get_all(&query.0).await?;
    Ok(success::Success::ok(Some(issues)))
}

#[get("/get/{id}")]
pub async fn find_one(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let issue = comic_issue_service.get_by_id(&id).await?;
    Ok(success::Success::ok(Some(issue)))
}

#[patch("/update/{id}")]
pub async fn update(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
    body: ValidatedJson<UpdateComicIssueModel>,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let issue = comic_issue_service.update(&id, body.0, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("Comic issue updated successfully"))
}

#[patch("/update/{id}/{field}")]
pub async fn update_file(
    comic_issue_service: web::Data<ComicIssueService>,
    path: web::Path<(Uuid, ComicIssueAsset)>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let (id, field) = path.into_inner();
    let intent = read_file_part(payload, field.as_str(), ENV.max_upload_size).await?;
    let issue = comic_issue_service.update_file(&id, field, intent, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("File uploaded successfully"))
}

#[patch("/publish/{id}")]
pub async fn publish(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let issue = comic_issue_service.publish(&id, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("Comic issue published"))
}

#[patch("/unpublish/{id}")]
pub async fn unpublish(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let issue = comic_issue_service.unpublish(&id, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("Comic issue unpublished"))
}

#[patch("/delete/{id}")]
pub async fn pseudo_delete(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let issue = comic_issue_service.pseudo_delete(&id, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("Comic issue queued for deletion"))
}

#[patch("/recover/{id}")]
pub async fn pseudo_recover(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<ComicIssueResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let issue = comic_issue_service.pseudo_recover(&id, &claims).await?;
    Ok(success::Success::ok(Some(issue)).message("Comic issue recovered"))
}

#[delete("/remove/{id}")]
pub async fn remove(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    comic_issue_service.remove(&id, &claims).await?;
    Ok(success::Success::no_content())
}

#[post("/{id}/pages")]
pub async fn add_page(
    comic_issue_service: web::Data<ComicIssueService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<CreateComicPageForm>,
) -> Result<success::Success<ComicPageResponse>, error::Error> {
    let claims = get_claims(&req)?;

    let (model, files) = form.into_parts();
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;

    let page = comic_issue_service.add_page(&id, model, files, &claims).await?;
    Ok(success::Success::created(Some(page)).message("Page added successfully"))
}
