//! Rule sets for each request body the API accepts.

use super::{Rule, Validator};
use crate::ports::LookupColumn;

/// `POST /api/auth/register`
pub fn registration() -> Validator {
    Validator::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field(
            "email",
            [
                Rule::Required,
                Rule::Email,
                Rule::unique(LookupColumn::UserEmail),
            ],
        )
        .field("password", [Rule::Required, Rule::String])
}

/// `POST /api/auth/login`
pub fn login() -> Validator {
    Validator::new()
        .field("email", [Rule::Required, Rule::String, Rule::Email])
        .field("password", [Rule::Required, Rule::String])
}

/// Post create and update. `current_id` is the post being updated, whose own
/// slug does not count as taken.
pub fn post(current_id: Option<i64>) -> Validator {
    Validator::new()
        .field("title", [Rule::Required, Rule::String])
        .field(
            "slug",
            [
                Rule::Required,
                Rule::String,
                Rule::unique_except(LookupColumn::PostSlug, current_id),
            ],
        )
        .field("body", [Rule::Required, Rule::String])
        .field(
            "author_id",
            [
                Rule::Required,
                Rule::Integer,
                Rule::Exists(LookupColumn::UserId),
            ],
        )
}

/// Movie create and update.
pub fn movie() -> Validator {
    Validator::new()
        .field("name", [Rule::Required, Rule::String])
        .field("title", [Rule::Required, Rule::String])
        .field("author", [Rule::Required, Rule::String])
}
