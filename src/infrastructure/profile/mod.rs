//! Profile infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProfileRepository;
pub(crate) use postgres_repository::row_to_profile;
pub use repository::InMemoryProfileRepository;
pub use service::ProfileService;
