//! Error handling - maps failures to the canonical error envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::DomainError;
use folio_core::error::RepoError;
use folio_core::ports::AuthError;
use folio_core::validation::ValidationErrors;
use folio_shared::ErrorResponse;
use std::fmt;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Application-level error type. The only place HTTP status codes are chosen.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Missing or unusable bearer token.
    Unauthenticated,
    /// Login attempt with an unknown email or a wrong password.
    InvalidCredentials,
    Validation(ValidationErrors),
    Internal(String),
}

impl AppError {
    /// Internal error whose body names the failed operation and its cause.
    pub fn failed(operation: &str, cause: impl fmt::Display) -> Self {
        AppError::Internal(format!("Failed to {operation}: {cause}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthenticated => ErrorResponse::unauthenticated(),
            AppError::InvalidCredentials => ErrorResponse::new(INVALID_CREDENTIALS)
                .with_field_error("email", INVALID_CREDENTIALS),
            AppError::Validation(errors) => {
                ErrorResponse::new(errors.summary()).with_errors(errors.clone().into_map())
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error(detail)
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} {} not found", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Auth(e) => e.into(),
            DomainError::Repo(e) => e.into(),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Not Found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::RevokedToken => {
                tracing::debug!(reason = %err, "Rejected bearer token");
                AppError::Unauthenticated
            }
            AuthError::Repo(e) => e.into(),
            AuthError::Hashing(msg) | AuthError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
