//! Post handlers. Every route requires a bearer token.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use folio_core::DomainError;
use folio_core::domain::{PageRequest, PostInput};
use folio_core::validation::schemas;
use folio_shared::dto::{PostData, PostListData, PostRequest};
use folio_shared::{ApiResponse, ErrorResponse};

use super::{PageQuery, write_failed};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::resources;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    DomainError::NotFound {
        entity_type: "Post",
        id,
    }
    .into()
}

/// Load a live post with its author and project it.
async fn load(state: &AppState, id: i64) -> AppResult<PostData> {
    let record = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(PostData {
        post: resources::post(&record),
    })
}

/// GET /api/posts
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(
        ("limit" = Option<i64>, Query, description = "Items per page, default 5"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
    ),
    responses(
        (status = 200, description = "One page of posts", body = ApiResponse<PostListData>),
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
    let records = state.posts.paginate(page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListData {
        posts: records.iter().map(resources::post).collect(),
    })))
}

/// POST /api/posts
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn store(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let input: PostInput = schemas::post(None)
        .validate(&body, state.lookup.as_ref())
        .await?
        .into_payload()?;

    let post = state
        .posts
        .create(input)
        .await
        .map_err(|e| write_failed("create post", "Post", 0, e))?;
    tracing::info!(post_id = post.id, user_id = identity.user_id, "Post created");

    let data = load(&state, post.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        data,
        "Post created successfully",
    )))
}

/// GET /api/posts/{id}
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post", body = ApiResponse<PostData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn show(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let data = load(&state, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// PUT /api/posts/{id}
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if state.posts.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }

    let input: PostInput = schemas::post(Some(id))
        .validate(&body, state.lookup.as_ref())
        .await?
        .into_payload()?;

    state
        .posts
        .update(id, input)
        .await
        .map_err(|e| write_failed("update post", "Post", id, e))?;
    tracing::info!(post_id = id, user_id = identity.user_id, "Post updated");

    let data = load(&state, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        data,
        "Post updated successfully",
    )))
}

/// DELETE /api/posts/{id}
///
/// Soft delete: the row stays, every later read treats it as missing.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .posts
        .soft_delete(id)
        .await
        .map_err(|e| write_failed("delete post", "Post", id, e))?;
    tracing::info!(post_id = id, user_id = identity.user_id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
