use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Post entity - a blog post owned by an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; set posts are hidden from every regular query.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields accepted when creating or replacing a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: i64,
}

/// A post together with its resolved author.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}
