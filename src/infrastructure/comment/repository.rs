//! In-memory comment repository implementation

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::comment::Body;
use crate::domain::user::UserId;
use crate::domain::{Comment, CommentId, CommentRepository, DomainError, Slug};
use crate::infrastructure::storage::{CommentRecord, InMemoryDatabase};

/// In-memory implementation of CommentRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    db: InMemoryDatabase,
}

impl InMemoryCommentRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<Vec<Comment>>, DomainError> {
        let tables = self.db.read().await;

        let Some(article) = tables.article_by_slug(slug.as_str()) else {
            return Ok(None);
        };

        // ids ascend with insertion, so this is oldest first
        let comments = tables
            .comments
            .values()
            .filter(|c| c.article_id == article.id)
            .filter_map(|c| tables.comment_view(c, viewer.map(|v| v.value())))
            .collect();

        Ok(Some(comments))
    }

    async fn create(
        &self,
        slug: &Slug,
        body: &Body,
        author: UserId,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(article_id) = tables.article_by_slug(slug.as_str()).map(|a| a.id) else {
            return Ok(None);
        };

        let now = Utc::now();
        let record = CommentRecord {
            id: tables.next_comment_id(),
            article_id,
            author_id: author.value(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        };

        let comment = tables.comment_view(&record, Some(author.value()));
        tables.comments.insert(record.id, record);

        Ok(comment)
    }

    async fn find(&self, slug: &Slug, id: CommentId) -> Result<Option<Comment>, DomainError> {
        let tables = self.db.read().await;

        let Some(article) = tables.article_by_slug(slug.as_str()) else {
            return Ok(None);
        };

        Ok(tables
            .comments
            .get(&id.value())
            .filter(|c| c.article_id == article.id)
            .and_then(|c| tables.comment_view(c, None)))
    }

    async fn delete(&self, slug: &Slug, id: CommentId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let Some(article_id) = tables.article_by_slug(slug.as_str()).map(|a| a.id) else {
            return Ok(false);
        };

        let belongs = tables
            .comments
            .get(&id.value())
            .is_some_and(|c| c.article_id == article_id);

        if belongs {
            tables.comments.remove(&id.value());
        }

        Ok(belongs)
    }
}
