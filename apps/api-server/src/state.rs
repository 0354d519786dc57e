//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostRepository;
use blog_infra::InMemoryPostRepository;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPostRepository::new()))
    }

    /// Build the application state with the store selected by configuration.
    ///
    /// A configured database that cannot be reached is an error, not a fallback.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory post store.");
            return Ok(Self::in_memory());
        };

        Self::database_backed(config, db_config).await
    }

    #[cfg(feature = "postgres")]
    async fn database_backed(
        config: &AppConfig,
        db_config: &blog_infra::DatabaseConfig,
    ) -> anyhow::Result<Self> {
        use blog_migration::{Migrator, MigratorTrait};

        let conn = blog_infra::connect(db_config).await?;
        if config.run_migrations {
            Migrator::up(&conn, None).await?;
            tracing::info!("Database migrations applied");
        }

        tracing::info!("Application state initialized (postgres)");
        Ok(Self::new(Arc::new(blog_infra::PostgresPostRepository::new(
            conn,
        ))))
    }

    #[cfg(not(feature = "postgres"))]
    async fn database_backed(
        _config: &AppConfig,
        _db_config: &blog_infra::DatabaseConfig,
    ) -> anyhow::Result<Self> {
        anyhow::bail!("DATABASE_URL is set but the server was built without the postgres feature")
    }
}
