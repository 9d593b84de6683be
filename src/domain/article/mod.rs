//! Article domain

mod entity;
mod repository;
mod values;

pub use entity::{
    ArticleFilter, ArticleId, ArticlePage, ArticleUpdate, CreatedArticle, UncreatedArticle,
};
pub use repository::ArticleRepository;
pub use values::{ArticleBody, Description, Slug, Tag, Title};
