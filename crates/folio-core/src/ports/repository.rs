use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AccessToken, Movie, MovieInput, NewUser, PageRequest, Post, PostInput, PostWithAuthor, User,
};
use crate::error::RepoError;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a user. A taken email yields `RepoError::Constraint`.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Post repository. Every read skips soft-deleted posts unless stated otherwise.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// One page of posts ordered by id, each with its author.
    async fn paginate(&self, page: PageRequest) -> Result<Vec<PostWithAuthor>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;

    /// Find a post whether or not it has been soft-deleted.
    ///
    /// Inspection hook: no handler reads trashed posts. Used to confirm that a
    /// soft delete kept the row.
    async fn find_with_trashed(&self, id: i64) -> Result<Option<Post>, RepoError>;

    async fn create(&self, input: PostInput) -> Result<Post, RepoError>;

    /// Replace the fields of a live post. Missing or trashed posts yield `RepoError::NotFound`.
    async fn update(&self, id: i64, input: PostInput) -> Result<Post, RepoError>;

    /// Mark a live post as deleted. A second call yields `RepoError::NotFound`.
    async fn soft_delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Movie repository.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn paginate(&self, page: PageRequest) -> Result<Vec<Movie>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepoError>;

    async fn create(&self, input: MovieInput) -> Result<Movie, RepoError>;

    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, RepoError>;

    /// Remove a movie permanently.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Storage for issued access tokens.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn save(&self, token: AccessToken) -> Result<AccessToken, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccessToken>, RepoError>;
}
