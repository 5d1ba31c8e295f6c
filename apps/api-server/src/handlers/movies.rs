//! Movie handlers. Every route requires a bearer token.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use folio_core::DomainError;
use folio_core::domain::{MovieInput, PageRequest};
use folio_core::validation::schemas;
use folio_shared::dto::{MovieData, MovieListData, MovieRequest};
use folio_shared::{ApiResponse, ErrorResponse};

use super::{PageQuery, write_failed};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::resources;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    DomainError::NotFound {
        entity_type: "Movie",
        id,
    }
    .into()
}

/// GET /api/movies
#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "Movies",
    params(
        ("limit" = Option<i64>, Query, description = "Items per page, default 5"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
    ),
    responses(
        (status = 200, description = "One page of movies", body = ApiResponse<MovieListData>),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn index(
    _identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from(query.into_inner());
    let movies = state.movies.paginate(page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MovieListData {
        movies: movies.iter().map(resources::movie).collect(),
    })))
}

/// POST /api/movies
#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "Movies",
    request_body = MovieRequest,
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<MovieData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    _identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let input: MovieInput = schemas::movie()
        .validate(&body, state.lookup.as_ref())
        .await?
        .into_payload()?;

    let movie = state
        .movies
        .create(input)
        .await
        .map_err(|e| write_failed("create movie", "Movie", 0, e))?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        MovieData {
            movie: resources::movie(&movie),
        },
        "Movie created successfully",
    )))
}

/// GET /api/movies/{id}
#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    tag = "Movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = ApiResponse<MovieData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such movie", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let movie = state
        .movies
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MovieData {
        movie: resources::movie(&movie),
    })))
}

/// PUT /api/movies/{id}
#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    tag = "Movies",
    params(("id" = i64, Path, description = "Movie id")),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<MovieData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such movie", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if state.movies.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }

    let input: MovieInput = schemas::movie()
        .validate(&body, state.lookup.as_ref())
        .await?
        .into_payload()?;

    let movie = state
        .movies
        .update(id, input)
        .await
        .map_err(|e| write_failed("update movie", "Movie", id, e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        MovieData {
            movie: resources::movie(&movie),
        },
        "Movie updated successfully",
    )))
}

/// DELETE /api/movies/{id}
#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    tag = "Movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such movie", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .movies
        .delete(id)
        .await
        .map_err(|e| write_failed("delete movie", "Movie", id, e))?;

    Ok(HttpResponse::NoContent().finish())
}
