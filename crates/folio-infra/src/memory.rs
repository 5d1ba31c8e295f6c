//! In-memory store - used when no database is configured, and by tests.
//!
//! One `InMemoryStore` implements every repository port plus the validation
//! lookups, so handlers see a consistent view across tables. It enforces the
//! same unique constraints as the SQL schema.
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{
    AccessToken, Movie, MovieInput, NewUser, PageRequest, Post, PostInput, PostWithAuthor, User,
};
use folio_core::error::RepoError;
use folio_core::ports::{
    AccessTokenRepository, LookupColumn, LookupValue, MovieRepository, PostRepository,
    RecordLookup, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    movies: BTreeMap<i64, Movie>,
    tokens: HashMap<Uuid, AccessToken>,
    next_user_id: i64,
    next_post_id: i64,
    next_movie_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn slug_taken(&self, slug: &str, except_id: Option<i64>) -> bool {
        self.posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except_id)
    }

    fn with_author(&self, post: &Post) -> Result<PostWithAuthor, RepoError> {
        let author = self.users.get(&post.author_id).cloned().ok_or_else(|| {
            RepoError::Query(format!("Post {} references missing author", post.id))
        })?;

        Ok(PostWithAuthor {
            post: post.clone(),
            author,
        })
    }

    fn live_post_mut(&mut self, id: i64) -> Option<&mut Post> {
        self.posts.get_mut(&id).filter(|p| !p.is_deleted())
    }

    fn check_author(&self, author_id: i64) -> Result<(), RepoError> {
        if self.users.contains_key(&author_id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!(
                "posts.author_id references missing user {author_id}"
            )))
        }
    }
}

/// In-memory implementation of every storage port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T: Clone>(items: impl Iterator<Item = T>, page: PageRequest) -> Vec<T> {
    items
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn paginate(&self, page: PageRequest) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        let live = tables.posts.values().filter(|p| !p.is_deleted());

        page_of(live, page)
            .into_iter()
            .map(|post| tables.with_author(post))
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;

        match tables.posts.get(&id).filter(|p| !p.is_deleted()) {
            Some(post) => tables.with_author(post).map(Some),
            None => Ok(None),
        }
    }

    async fn find_with_trashed(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, input: PostInput) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.slug_taken(&input.slug, None) {
            return Err(RepoError::Constraint("posts.slug must be unique".to_string()));
        }
        tables.check_author(input.author_id)?;

        let now = Utc::now();
        let post = Post {
            id: Tables::next_id(&mut tables.next_post_id),
            title: input.title,
            slug: input.slug,
            body: input.body,
            author_id: input.author_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(&self, id: i64, input: PostInput) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.live_post_mut(id).is_none() {
            return Err(RepoError::NotFound);
        }
        if tables.slug_taken(&input.slug, Some(id)) {
            return Err(RepoError::Constraint("posts.slug must be unique".to_string()));
        }
        tables.check_author(input.author_id)?;

        let post = tables.live_post_mut(id).ok_or(RepoError::NotFound)?;
        post.title = input.title;
        post.slug = input.slug;
        post.body = input.body;
        post.author_id = input.author_id;
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.live_post_mut(id).ok_or(RepoError::NotFound)?;

        post.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn paginate(&self, page: PageRequest) -> Result<Vec<Movie>, RepoError> {
        let tables = self.tables.read().await;
        Ok(page_of(tables.movies.values().cloned(), page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepoError> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn create(&self, input: MovieInput) -> Result<Movie, RepoError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let movie = Movie {
            id: Tables::next_id(&mut tables.next_movie_id),
            name: input.name,
            title: input.title,
            author: input.author,
            created_at: now,
            updated_at: now,
        };
        tables.movies.insert(movie.id, movie.clone());

        Ok(movie)
    }

    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, RepoError> {
        let mut tables = self.tables.write().await;
        let movie = tables.movies.get_mut(&id).ok_or(RepoError::NotFound)?;

        movie.name = input.name;
        movie.title = input.title;
        movie.author = input.author;
        movie.updated_at = Utc::now();

        Ok(movie.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryStore {
    async fn save(&self, token: AccessToken) -> Result<AccessToken, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&token.user_id) {
            return Err(RepoError::Constraint(format!(
                "personal_access_tokens.user_id references missing user {}",
                token.user_id
            )));
        }
        tables.tokens.insert(token.id, token.clone());

        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccessToken>, RepoError> {
        Ok(self.tables.read().await.tokens.get(&id).cloned())
    }
}

#[async_trait]
impl RecordLookup for InMemoryStore {
    async fn count(
        &self,
        column: LookupColumn,
        value: &LookupValue,
        except_id: Option<i64>,
    ) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let kept = |id: i64| Some(id) != except_id;

        let count = match column {
            LookupColumn::UserEmail => {
                let email = value.as_text();
                tables
                    .users
                    .values()
                    .filter(|u| u.email == email && kept(u.id))
                    .count()
            }
            LookupColumn::UserId => match value.as_id() {
                Some(id) => usize::from(tables.users.contains_key(&id) && kept(id)),
                None => 0,
            },
            LookupColumn::PostSlug => {
                let slug = value.as_text();
                tables
                    .posts
                    .values()
                    .filter(|p| p.slug == slug && kept(p.id))
                    .count()
            }
        };

        Ok(count as u64)
    }
}
