//! HTTP handlers and route configuration.

pub(crate) mod auth;
pub(crate) mod movies;
pub(crate) mod posts;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::OpenApi;

use folio_core::domain::PageRequest;
use folio_core::error::RepoError;

use crate::middleware::error::AppError;
use crate::openapi::ApiDoc;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(
            web::scope("/api")
                // Public routes
                .route("/docs/openapi.json", web::get().to(openapi_json))
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login))
                        .route("/register", web::post().to(auth::register)),
                )
                // Bearer-protected routes
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::index))
                                .route(web::post().to(posts::store)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::show))
                                .route(web::put().to(posts::update))
                                .route(web::delete().to(posts::destroy)),
                        ),
                )
                .service(
                    web::scope("/movies")
                        .service(
                            web::resource("")
                                .route(web::get().to(movies::index))
                                .route(web::post().to(movies::store)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(movies::show))
                                .route(web::put().to(movies::update))
                                .route(web::delete().to(movies::destroy)),
                        ),
                ),
        );
}

/// GET /api/docs/openapi.json
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Ids that do not parse name no record.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Not Found".to_string()).into())
}

/// `?limit=&page=` on list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let positive = |v: i64| v.max(1) as u64;
        PageRequest::new(query.limit.map(positive), query.page.map(positive))
    }
}

/// Map a failed write to a response, naming the operation.
fn write_failed(operation: &str, entity_type: &'static str, id: i64, err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound(format!("{} {} not found", entity_type, id)),
        other => AppError::failed(operation, other),
    }
}
