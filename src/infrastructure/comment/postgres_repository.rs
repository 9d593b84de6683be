//! PostgreSQL comment repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::comment::Body;
use crate::domain::user::UserId;
use crate::domain::{Comment, CommentId, CommentRepository, DomainError, Slug};
use crate::infrastructure::profile::row_to_profile;
use crate::infrastructure::storage::read_error;

/// Comment columns plus the author profile, as seen by the viewer bound to `$1`
const COMMENT_VIEW: &str = r#"
    SELECT c.id, c.body, c.author_id, c.created_at, c.updated_at,
           u.username, u.bio, u.image,
           EXISTS(
               SELECT 1 FROM follows fo
               WHERE fo.followee_id = c.author_id AND fo.follower_id = $1
           ) AS following
    FROM comments c
    JOIN users u ON u.id = c.author_id
    JOIN articles a ON a.id = c.article_id
"#;

/// PostgreSQL implementation of CommentRepository
#[derive(Debug, Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn article_id(&self, slug: &Slug) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar("SELECT id FROM articles WHERE slug = $1")
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("get article"))
    }

    async fn find_for_viewer(
        &self,
        slug: &Slug,
        id: i64,
        viewer: Option<UserId>,
    ) -> Result<Option<Comment>, DomainError> {
        let query = format!("{} WHERE a.slug = $2 AND c.id = $3", COMMENT_VIEW);

        let row = sqlx::query(&query)
            .bind(viewer.map(|v| v.value()))
            .bind(slug.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("get comment"))?;

        row.as_ref().map(row_to_comment).transpose()
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<Vec<Comment>>, DomainError> {
        if self.article_id(slug).await?.is_none() {
            return Ok(None);
        }

        let query = format!("{} WHERE a.slug = $2 ORDER BY c.created_at, c.id", COMMENT_VIEW);
        let rows = sqlx::query(&query)
            .bind(viewer.map(|v| v.value()))
            .bind(slug.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("list comments"))?;

        rows.iter()
            .map(row_to_comment)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn create(
        &self,
        slug: &Slug,
        body: &Body,
        author: UserId,
    ) -> Result<Option<Comment>, DomainError> {
        let Some(article_id) = self.article_id(slug).await? else {
            return Ok(None);
        };

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (article_id, author_id, body)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(article_id)
        .bind(author.value())
        .bind(body.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("create comment"))?;

        self.find_for_viewer(slug, id, Some(author)).await
    }

    async fn find(&self, slug: &Slug, id: CommentId) -> Result<Option<Comment>, DomainError> {
        self.find_for_viewer(slug, id.value(), None).await
    }

    async fn delete(&self, slug: &Slug, id: CommentId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $2
              AND article_id = (SELECT id FROM articles WHERE slug = $1)
            "#,
        )
        .bind(slug.as_str())
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(read_error("delete comment"))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_comment(row: &PgRow) -> Result<Comment, DomainError> {
    let id: i64 = row.try_get("id").map_err(read_error("read comment id"))?;
    let body: String = row.try_get("body").map_err(read_error("read comment body"))?;
    let author_id: i64 = row
        .try_get("author_id")
        .map_err(read_error("read author id"))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(read_error("read created_at"))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(read_error("read updated_at"))?;

    Ok(Comment {
        id: CommentId::new_without_validation(id),
        created_at,
        updated_at,
        body: Body::new_without_validation(body),
        author_id: UserId::new(author_id),
        author: row_to_profile(row)?,
    })
}
