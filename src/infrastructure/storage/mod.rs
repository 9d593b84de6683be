//! Storage infrastructure - in-memory database, PostgreSQL pool and migrations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryDatabase;
pub(crate) use in_memory::{ArticleRecord, CommentRecord, Tables, UserRecord};
pub use migrations::{
    revert_last_storage_migration, run_storage_migrations, Migration, PostgresMigrator,
};
pub use postgres::{connect, PostgresConfig};
pub(crate) use postgres::{map_write_error, read_error};
