//! The response envelopes used by every endpoint.
//!
//! Success: `{"message": ..., "data": ...}`.
//! Failure: `{"message": ..., "errors": {"field": ["..."]}}`, `errors` only
//! present for field-scoped failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Messages per request field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = "Success")]
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub const DEFAULT_MESSAGE: &'static str = "Success";

    pub fn ok(data: T) -> Self {
        Self {
            message: Self::DEFAULT_MESSAGE.to_string(),
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// A human-readable summary of the failure.
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<BTreeMap<String, Vec<String>>>)]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Error carrying one message for one field.
    pub fn with_field_error(self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        self.with_errors(errors)
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn unauthenticated() -> Self {
        Self::new("Unauthenticated.")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }
}
