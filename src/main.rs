use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    api::error,
    assets::{AssetResolver, AssetUploader},
    configs::{asset_config, connect_database, connect_storage},
    middlewares::authentication,
    modules::{
        carousel::{repository_pg::CarouselRepositoryPg, service::CarouselService},
        comic::{repository_pg::ComicRepositoryPg, service::ComicService},
        comic_issue::{repository_pg::ComicIssueRepositoryPg, service::ComicIssueService},
        creator::{repository_pg::CreatorRepositoryPg, service::CreatorService},
    },
};

mod api;
mod assets;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod storage;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(from_fn(authentication))
            .configure(modules::creator::route::configure)
            .configure(modules::comic::route::configure)
            .configure(modules::comic_issue::route::configure)
            .configure(modules::carousel::route::configure),
    );
}

fn multipart_config(limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
        .error_handler(|err, _req| error::Error::bad_request(err.to_string()).into())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let storage =
        connect_storage().map_err(|_| std::io::Error::other("Object storage configuration error"))?;

    let asset_config = asset_config();
    let uploader = AssetUploader::new(storage.clone(), &asset_config);
    let resolver = AssetResolver::new(storage, asset_config.presign_ttl);

    let creator_service = CreatorService::with_dependencies(
        Arc::new(CreatorRepositoryPg::new(db_pool.clone())),
        uploader.clone(),
        resolver.clone(),
    );
    let comic_service = ComicService::with_dependencies(
        Arc::new(ComicRepositoryPg::new(db_pool.clone())),
        uploader.clone(),
        resolver.clone(),
    );
    let comic_issue_service = ComicIssueService::with_dependencies(
        Arc::new(ComicIssueRepositoryPg::new(db_pool.clone())),
        uploader.clone(),
        resolver.clone(),
    );
    let carousel_service = CarouselService::with_dependencies(
        Arc::new(CarouselRepositoryPg::new(db_pool)),
        uploader,
        resolver,
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(multipart_config(ENV.max_upload_size))
            .app_data(web::Data::new(creator_service.clone()))
            .app_data(web::Data::new(comic_service.clone()))
            .app_data(web::Data::new(comic_issue_service.clone()))
            .app_data(web::Data::new(carousel_service.clone()))
            .service(health_check)
            .configure(api_configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn health_check_is_public() {
        let app = test::init_service(App::new().service(health_check).configure(api_configure)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn api_requires_a_bearer_token() {
        let app = test::init_service(App::new().service(health_check).configure(api_configure)).await;

        for uri in ["/api/comic/get", "/api/carousel/slides/get", "/api/creator/get/studio"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let err = test::try_call_service(&app, req).await.unwrap_err();
            assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
