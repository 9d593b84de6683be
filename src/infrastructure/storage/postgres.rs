//! PostgreSQL connection pooling and shared row helpers

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/conduit".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Open a connection pool
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Map a unique violation to `Conflict`, anything else to `Storage`
pub(crate) fn map_write_error(
    error: sqlx::Error,
    action: &str,
    conflict: impl FnOnce(&str) -> DomainError,
) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return conflict(db.constraint().unwrap_or_default());
        }
    }

    DomainError::storage(format!("Failed to {}: {}", action, error))
}

/// Map a read error to `Storage`
pub(crate) fn read_error(action: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::storage(format!("Failed to {}: {}", action, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config() {
        let config = PostgresConfig::new("postgres://localhost/test").with_max_connections(20);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_read_error_is_storage() {
        let error = read_error("load user")(sqlx::Error::RowNotFound);

        assert!(matches!(error, DomainError::Storage { .. }));
        assert!(error.to_string().contains("load user"));
    }

    #[test]
    fn test_non_database_write_error_is_storage() {
        let error = map_write_error(sqlx::Error::PoolTimedOut, "create user", |_| {
            DomainError::conflict("taken")
        });

        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
