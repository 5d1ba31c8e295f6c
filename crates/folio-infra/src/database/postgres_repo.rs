//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use folio_core::domain::{
    AccessToken, Movie, MovieInput, NewUser, PageRequest, Post, PostInput, PostWithAuthor, User,
};
use folio_core::error::RepoError;
use folio_core::ports::{
    AccessTokenRepository, LookupColumn, LookupValue, MovieRepository, PostRepository,
    RecordLookup, UserRepository,
};

use super::entity::access_token::{self, Entity as AccessTokenEntity};
use super::entity::movie::{self, Entity as MovieEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresRepository<PostEntity>;

/// PostgreSQL movie repository.
pub type PostgresMovieRepository = PostgresRepository<MovieEntity>;

/// PostgreSQL access token repository.
pub type PostgresAccessTokenRepository = PostgresRepository<AccessTokenEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now().fixed_offset();

        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }
}

/// Posts that have not been soft-deleted.
fn live_posts() -> Select<PostEntity> {
    PostEntity::find().filter(post::Column::DeletedAt.is_null())
}

fn with_author(
    (post, author): (post::Model, Option<user::Model>),
) -> Result<PostWithAuthor, RepoError> {
    let author = author.ok_or_else(|| {
        RepoError::Query(format!("Post {} references missing author", post.id))
    })?;

    Ok(PostWithAuthor {
        post: post.into(),
        author: author.into(),
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn paginate(&self, page: PageRequest) -> Result<Vec<PostWithAuthor>, RepoError> {
        let rows = live_posts()
            .order_by_asc(post::Column::Id)
            .limit(page.limit)
            .offset(page.offset())
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = live_posts()
            .filter(post::Column::Id.eq(id))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        row.map(with_author).transpose()
    }

    async fn find_with_trashed(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn create(&self, input: PostInput) -> Result<Post, RepoError> {
        let now = Utc::now().fixed_offset();

        let model = post::ActiveModel {
            id: NotSet,
            title: Set(input.title),
            slug: Set(input.slug),
            body: Set(input.body),
            author_id: Set(input.author_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, input: PostInput) -> Result<Post, RepoError> {
        let existing = live_posts()
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        let mut active: post::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.slug = Set(input.slug);
        active.body = Set(input.body);
        active.author_id = Set(input.author_id);
        active.updated_at = Set(Utc::now().fixed_offset());

        let model = active.update(&self.db).await.map_err(write_error)?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::DeletedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn paginate(&self, page: PageRequest) -> Result<Vec<Movie>, RepoError> {
        let rows = MovieEntity::find()
            .order_by_asc(movie::Column::Id)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn create(&self, input: MovieInput) -> Result<Movie, RepoError> {
        let now = Utc::now().fixed_offset();

        let model = movie::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            title: Set(input.title),
            author: Set(input.author),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, RepoError> {
        let existing = self.find_model(id).await?.ok_or(RepoError::NotFound)?;

        let mut active: movie::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.title = Set(input.title);
        active.author = Set(input.author);
        active.updated_at = Set(Utc::now().fixed_offset());

        let model = active.update(&self.db).await.map_err(write_error)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.delete_row(id).await
    }
}

#[async_trait]
impl AccessTokenRepository for PostgresAccessTokenRepository {
    async fn save(&self, token: AccessToken) -> Result<AccessToken, RepoError> {
        let active: access_token::ActiveModel = token.into();
        let model = active.insert(&self.db).await.map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccessToken>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }
}

/// Validation lookups against PostgreSQL.
///
/// Counts include soft-deleted posts, matching the unique index on `posts.slug`.
pub struct PostgresRecordLookup {
    db: DbConn,
}

impl PostgresRecordLookup {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn excluding<E, C>(select: Select<E>, id_column: C, except_id: Option<i64>) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    match except_id {
        Some(id) => select.filter(id_column.ne(id)),
        None => select,
    }
}

#[async_trait]
impl RecordLookup for PostgresRecordLookup {
    async fn count(
        &self,
        column: LookupColumn,
        value: &LookupValue,
        except_id: Option<i64>,
    ) -> Result<u64, RepoError> {
        let count = match column {
            LookupColumn::UserEmail => {
                let select = UserEntity::find().filter(user::Column::Email.eq(value.as_text()));
                excluding(select, user::Column::Id, except_id)
                    .count(&self.db)
                    .await
            }
            LookupColumn::UserId => {
                let Some(id) = value.as_id() else {
                    return Ok(0);
                };
                let select = UserEntity::find().filter(user::Column::Id.eq(id));
                excluding(select, user::Column::Id, except_id)
                    .count(&self.db)
                    .await
            }
            LookupColumn::PostSlug => {
                let select = PostEntity::find().filter(post::Column::Slug.eq(value.as_text()));
                excluding(select, post::Column::Id, except_id)
                    .count(&self.db)
                    .await
            }
        };

        count.map_err(query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}
