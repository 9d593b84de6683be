//! Domain layer - Core business logic and entities

pub mod article;
pub mod comment;
pub mod error;
pub mod pagination;
pub mod profile;
pub mod session;
pub mod user;
pub mod validation;

pub use article::{
    ArticleFilter, ArticlePage, ArticleRepository, ArticleUpdate, CreatedArticle, Slug, Tag,
    UncreatedArticle,
};
pub use comment::{Comment, CommentId, CommentRepository};
pub use error::DomainError;
pub use pagination::{Limit, Offset};
pub use profile::{Profile, ProfileRepository};
pub use session::Session;
pub use user::{Email, RegisteredUser, UnregisteredUser, UserId, UserRepository, UserUpdate};
pub use validation::{ValidationError, ValidationErrors, Validated};
