//! Comment repository trait

use async_trait::async_trait;

use super::entity::Comment;
use super::values::{Body, CommentId};
use crate::domain::article::Slug;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for comments attached to articles
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of an article, oldest first; `Ok(None)` when the article does not exist
    async fn list(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<Vec<Comment>>, DomainError>;

    /// Add a comment; `Ok(None)` when the article does not exist
    async fn create(
        &self,
        slug: &Slug,
        body: &Body,
        author: UserId,
    ) -> Result<Option<Comment>, DomainError>;

    async fn find(&self, slug: &Slug, id: CommentId) -> Result<Option<Comment>, DomainError>;

    async fn delete(&self, slug: &Slug, id: CommentId) -> Result<bool, DomainError>;
}
