//! Article repository trait

use async_trait::async_trait;

use super::entity::{ArticleFilter, ArticlePage, ArticleUpdate, CreatedArticle, UncreatedArticle};
use super::values::{Slug, Tag};
use crate::domain::pagination::{Limit, Offset};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for articles, their tags and favorites.
///
/// Every read takes an optional viewer so `favorited` and `author.following`
/// can be computed for that user.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List articles matching `filter`, most recent first
    async fn list(
        &self,
        filter: &ArticleFilter,
        viewer: Option<UserId>,
    ) -> Result<ArticlePage, DomainError>;

    /// Articles written by users that `viewer` follows, most recent first
    async fn feed(
        &self,
        viewer: UserId,
        limit: Limit,
        offset: Offset,
    ) -> Result<ArticlePage, DomainError>;

    async fn find_by_slug(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<CreatedArticle>, DomainError>;

    /// Store a new article under `slug`. Fails with `Conflict` when the slug is taken.
    async fn create(
        &self,
        slug: &Slug,
        article: &UncreatedArticle,
        author: UserId,
    ) -> Result<CreatedArticle, DomainError>;

    /// Apply a partial update; `Ok(None)` when the article does not exist
    async fn update(
        &self,
        slug: &Slug,
        update: &ArticleUpdate,
        viewer: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError>;

    /// Delete an article together with its comments, tags and favorites
    async fn delete(&self, slug: &Slug) -> Result<bool, DomainError>;

    /// Mark as favorite of `user`. Idempotent. `Ok(None)` when the article does not exist.
    async fn favorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError>;

    /// Remove from favorites of `user`. Idempotent. `Ok(None)` when the article does not exist.
    async fn unfavorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError>;

    /// All distinct tags in use
    async fn tags(&self) -> Result<Vec<Tag>, DomainError>;
}
