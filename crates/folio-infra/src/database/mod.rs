//! Database connection management and PostgreSQL repositories.

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAccessTokenRepository, PostgresMovieRepository, PostgresPostRepository,
    PostgresRecordLookup, PostgresUserRepository,
};
