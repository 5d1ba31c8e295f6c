//! Data Transfer Objects - the public JSON shapes of each resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload of successful login and registration responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenData {
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub access_token: String,
}

/// Public projection of a user embedded in other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorResource {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResource {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author: AuthorResource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieResource {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub author: String,
}

/// `data` of single-post responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostData {
    pub post: PostResource,
}

/// `data` of the post listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListData {
    pub posts: Vec<PostResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieData {
    pub movie: MovieResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieListData {
    pub movies: Vec<MovieResource>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(max_length = 255)]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Body of post create and update. `slug` must be unique.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostRequest {
    pub title: String,
    #[schema(example = "hello-world")]
    pub slug: String,
    pub body: String,
    /// Id of an existing user.
    pub author_id: i64,
}

/// Body of movie create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieRequest {
    pub name: String,
    pub title: String,
    pub author: String,
}
