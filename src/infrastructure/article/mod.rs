//! Article infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresArticleRepository;
pub use repository::InMemoryArticleRepository;
pub(crate) use service::{article_not_found, parse_slug};
pub use service::{ArticleService, ListArticlesQuery, NewArticleRequest, UpdateArticleRequest};
