//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    ArticleRepository, CommentRepository, DomainError, ProfileRepository, UserRepository,
};
use crate::infrastructure::article::{InMemoryArticleRepository, PostgresArticleRepository};
use crate::infrastructure::comment::{InMemoryCommentRepository, PostgresCommentRepository};
use crate::infrastructure::profile::{InMemoryProfileRepository, PostgresProfileRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::in_memory::InMemoryDatabase;
use super::migrations::run_storage_migrations;
use super::postgres::{connect, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// One repository per aggregate, all backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

impl Repositories {
    pub fn in_memory(db: InMemoryDatabase) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new(db.clone())),
            profiles: Arc::new(InMemoryProfileRepository::new(db.clone())),
            articles: Arc::new(InMemoryArticleRepository::new(db.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(db)),
        }
    }
}

/// Factory for creating repository sets
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories for the configured backend.
    /// PostgreSQL pools are migrated to the latest schema first.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory(InMemoryDatabase::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect(pg_config).await?;
                let version = run_storage_migrations(&pool).await?;
                info!(schema_version = ?version, "Using PostgreSQL storage");

                Ok(Repositories {
                    users: Arc::new(PostgresUserRepository::new(pool.clone())),
                    profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
                    articles: Arc::new(PostgresArticleRepository::new(pool.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(pool)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnregisteredUser;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres_url("postgres://localhost/test").storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_in_memory_repositories_share_one_store() {
        let repositories = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        let user = UnregisteredUser::new(Some("jake@jake.jake"), Some("jake"), Some("password"))
            .unwrap();
        repositories.users.register(&user, "hash").await.unwrap();

        let profile = repositories
            .profiles
            .find_by_username(user.username(), None)
            .await
            .unwrap();
        assert!(profile.is_some());
    }
}
