use std::marker::PhantomData;

use sea_orm::{DbConn, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};

use folio_core::error::RepoError;

/// Generic PostgreSQL repository over one SeaORM entity.
///
/// Port implementations live on the concrete aliases in `postgres_repo`;
/// this type holds the connection and the lookups every table shares.
pub struct PostgresRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Fetch a row by primary key.
    pub(crate) async fn find_model<ID>(&self, id: ID) -> Result<Option<E::Model>, RepoError>
    where
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id).one(&self.db).await.map_err(query_error)
    }

    /// Physically delete a row. Zero affected rows is `RepoError::NotFound`.
    pub(crate) async fn delete_row<ID>(&self, id: ID) -> Result<(), RepoError>
    where
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// Map a read failure.
pub(crate) fn query_error(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Map a write failure, surfacing constraint violations.
pub(crate) fn write_error(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Constraint(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => RepoError::Constraint(detail),
        _ => query_error(err),
    }
}
