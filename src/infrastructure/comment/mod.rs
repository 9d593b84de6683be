//! Comment infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresCommentRepository;
pub use repository::InMemoryCommentRepository;
pub use service::CommentService;
