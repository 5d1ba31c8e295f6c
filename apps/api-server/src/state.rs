//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{
    MovieRepository, PasswordService, PostRepository, RecordLookup, TokenSigner,
};
use folio_core::services::AuthService;
use folio_infra::{Argon2PasswordService, InMemoryStore, JwtTokenSigner};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub lookup: Arc<dyn RecordLookup>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Build the application state, preferring PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let signer: Arc<dyn TokenSigner> = Arc::new(JwtTokenSigner::new(config.jwt.clone()));

        #[cfg(feature = "postgres")]
        {
            if let Some(state) = Self::postgres(config, passwords.clone(), signer.clone()).await {
                return state;
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the `postgres` feature");
            }
        }

        Self::in_memory(Arc::new(InMemoryStore::new()), passwords, signer)
    }

    /// State backed entirely by one in-memory store.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        passwords: Arc<dyn PasswordService>,
        signer: Arc<dyn TokenSigner>,
    ) -> Self {
        let auth = AuthService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            passwords,
            signer,
        );

        Self {
            posts: store.clone(),
            movies: store.clone(),
            lookup: store,
            auth: Arc::new(auth),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        config: &AppConfig,
        passwords: Arc<dyn PasswordService>,
        signer: Arc<dyn TokenSigner>,
    ) -> Option<Self> {
        use folio_infra::database::connect;
        use folio_infra::{
            PostgresAccessTokenRepository, PostgresMovieRepository, PostgresPostRepository,
            PostgresRecordLookup, PostgresUserRepository,
        };
        use migration::MigratorTrait;

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        let db = match connect(db_config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        if config.auto_migrate {
            if let Err(e) = migration::Migrator::up(&db, None).await {
                tracing::error!("Failed to apply migrations: {}. Using in-memory fallback.", e);
                return None;
            }
            tracing::info!("Database migrations applied");
        }

        let auth = AuthService::new(
            Arc::new(PostgresUserRepository::new(db.clone())),
            Arc::new(PostgresAccessTokenRepository::new(db.clone())),
            Arc::new(PostgresRecordLookup::new(db.clone())),
            passwords,
            signer,
        );

        Some(Self {
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            movies: Arc::new(PostgresMovieRepository::new(db.clone())),
            lookup: Arc::new(PostgresRecordLookup::new(db)),
            auth: Arc::new(auth),
        })
    }
}
