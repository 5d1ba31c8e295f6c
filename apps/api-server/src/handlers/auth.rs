//! Authentication handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use folio_core::services::IssuedToken;
use folio_shared::dto::{AccessTokenData, LoginRequest, RegisterRequest};
use folio_shared::{ApiResponse, ErrorResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn token_body(issued: IssuedToken, message: &str) -> ApiResponse<AccessTokenData> {
    ApiResponse::ok_with_message(
        AccessTokenData {
            access_token: issued.access_token,
        },
        message,
    )
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<AccessTokenData>),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    let issued = state.auth.login(&body).await?;
    tracing::info!(user_id = issued.user.id, "User logged in");

    Ok(HttpResponse::Ok().json(token_body(issued, "Success Login")))
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created and token issued", body = ApiResponse<AccessTokenData>),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let issued = state.auth.register(&body).await?;

    Ok(HttpResponse::Created().json(token_body(issued, "User created successfully")))
}
