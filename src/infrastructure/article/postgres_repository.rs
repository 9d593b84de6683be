//! PostgreSQL article repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use super::repository::SLUG_TAKEN;
use crate::domain::article::{ArticleBody, ArticleId, Description, Title};
use crate::domain::user::UserId;
use crate::domain::{
    ArticleFilter, ArticlePage, ArticleRepository, ArticleUpdate, CreatedArticle, DomainError,
    Limit, Offset, Slug, Tag, UncreatedArticle,
};
use crate::infrastructure::profile::row_to_profile;
use crate::infrastructure::storage::{map_write_error, read_error};

/// Article columns plus the author profile, as seen by the viewer bound to `$1`
const ARTICLE_VIEW: &str = r#"
    SELECT a.id, a.slug, a.title, a.description, a.body, a.author_id,
           a.created_at, a.updated_at,
           u.username, u.bio, u.image,
           COALESCE(
               (SELECT array_agg(t.tag ORDER BY t.position)
                FROM article_tags t WHERE t.article_id = a.id),
               ARRAY[]::TEXT[]
           ) AS tag_list,
           (SELECT COUNT(*) FROM favorites f WHERE f.article_id = a.id) AS favorites_count,
           EXISTS(
               SELECT 1 FROM favorites f WHERE f.article_id = a.id AND f.user_id = $1
           ) AS favorited,
           EXISTS(
               SELECT 1 FROM follows fo
               WHERE fo.followee_id = a.author_id AND fo.follower_id = $1
           ) AS following
    FROM articles a
    JOIN users u ON u.id = a.author_id
"#;

const NEWEST_FIRST: &str = "ORDER BY a.created_at DESC, a.id DESC";

/// List filters over `a` (articles) and `u` (author), with the tag, author
/// and favorited-by parameters starting at `$first`
fn list_filter(first: usize) -> String {
    format!(
        r#"
        (${tag}::TEXT IS NULL OR EXISTS(
            SELECT 1 FROM article_tags t WHERE t.article_id = a.id AND t.tag = ${tag}
        ))
        AND (${author}::TEXT IS NULL OR u.username = ${author})
        AND (${favorited}::TEXT IS NULL OR EXISTS(
            SELECT 1 FROM favorites f JOIN users fu ON fu.id = f.user_id
            WHERE f.article_id = a.id AND fu.username = ${favorited}
        ))
        "#,
        tag = first,
        author = first + 1,
        favorited = first + 2,
    )
}

/// PostgreSQL implementation of ArticleRepository
#[derive(Debug, Clone)]
pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn list(
        &self,
        filter: &ArticleFilter,
        viewer: Option<UserId>,
    ) -> Result<ArticlePage, DomainError> {
        let tag = filter.tag.as_ref().map(|t| t.as_str());
        let author = filter.author.as_ref().map(|a| a.as_str());
        let favorited_by = filter.favorited_by.as_ref().map(|f| f.as_str());

        let count_query = format!(
            "SELECT COUNT(*) FROM articles a JOIN users u ON u.id = a.author_id WHERE {}",
            list_filter(1)
        );
        let articles_count: i64 = sqlx::query_scalar(&count_query)
            .bind(tag)
            .bind(author)
            .bind(favorited_by)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("count articles"))?;

        let list_query = format!(
            "{} WHERE {} {} LIMIT $5 OFFSET $6",
            ARTICLE_VIEW,
            list_filter(2),
            NEWEST_FIRST
        );
        let rows = sqlx::query(&list_query)
            .bind(viewer.map(|v| v.value()))
            .bind(tag)
            .bind(author)
            .bind(favorited_by)
            .bind(i64::from(filter.limit.value()))
            .bind(sql_offset(filter.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("list articles"))?;

        Ok(ArticlePage {
            articles: rows.iter().map(row_to_article).collect::<Result<_, _>>()?,
            articles_count: articles_count as u64,
        })
    }

    async fn feed(
        &self,
        viewer: UserId,
        limit: Limit,
        offset: Offset,
    ) -> Result<ArticlePage, DomainError> {
        let articles_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM articles a
            WHERE EXISTS(
                SELECT 1 FROM follows fo
                WHERE fo.follower_id = $1 AND fo.followee_id = a.author_id
            )
            "#,
        )
        .bind(viewer.value())
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("count feed articles"))?;

        let feed_query = format!(
            r#"{}
            WHERE EXISTS(
                SELECT 1 FROM follows fo
                WHERE fo.follower_id = $1 AND fo.followee_id = a.author_id
            )
            {} LIMIT $2 OFFSET $3"#,
            ARTICLE_VIEW, NEWEST_FIRST
        );
        let rows = sqlx::query(&feed_query)
            .bind(viewer.value())
            .bind(i64::from(limit.value()))
            .bind(sql_offset(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("list feed articles"))?;

        Ok(ArticlePage {
            articles: rows.iter().map(row_to_article).collect::<Result<_, _>>()?,
            articles_count: articles_count as u64,
        })
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let query = format!("{} WHERE a.slug = $2", ARTICLE_VIEW);

        let row = sqlx::query(&query)
            .bind(viewer.map(|v| v.value()))
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("get article"))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn create(
        &self,
        slug: &Slug,
        article: &UncreatedArticle,
        author: UserId,
    ) -> Result<CreatedArticle, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(read_error("begin transaction"))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (slug, title, description, body, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(slug.as_str())
        .bind(article.title().as_str())
        .bind(article.description().as_str())
        .bind(article.body().as_str())
        .bind(author.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(e, "create article", |_| DomainError::conflict(SLUG_TAKEN))
        })?;

        for (position, tag) in article.tag_list().iter().enumerate() {
            sqlx::query("INSERT INTO article_tags (article_id, tag, position) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(tag.as_str())
                .bind(position as i32)
                .execute(&mut *tx)
                .await
                .map_err(read_error("tag article"))?;
        }

        tx.commit()
            .await
            .map_err(read_error("commit article"))?;

        self.find_by_slug(slug, Some(author))
            .await?
            .ok_or_else(|| DomainError::storage(format!("Article '{}' vanished after insert", slug)))
    }

    async fn update(
        &self,
        slug: &Slug,
        update: &ArticleUpdate,
        viewer: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                body = COALESCE($4, body),
                updated_at = NOW()
            WHERE slug = $1
            "#,
        )
        .bind(slug.as_str())
        .bind(update.title.as_ref().map(|v| v.as_str()))
        .bind(update.description.as_ref().map(|v| v.as_str()))
        .bind(update.body.as_ref().map(|v| v.as_str()))
        .execute(&self.pool)
        .await
        .map_err(read_error("update article"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_slug(slug, Some(viewer)).await
    }

    async fn delete(&self, slug: &Slug) -> Result<bool, DomainError> {
        // tags, favorites and comments go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM articles WHERE slug = $1")
            .bind(slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(read_error("delete article"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, article_id)
            SELECT $2, id FROM articles WHERE slug = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(slug.as_str())
        .bind(user.value())
        .execute(&self.pool)
        .await
        .map_err(read_error("favorite article"))?;

        self.find_by_slug(slug, Some(user)).await
    }

    async fn unfavorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $2
              AND article_id = (SELECT id FROM articles WHERE slug = $1)
            "#,
        )
        .bind(slug.as_str())
        .bind(user.value())
        .execute(&self.pool)
        .await
        .map_err(read_error("unfavorite article"))?;

        self.find_by_slug(slug, Some(user)).await
    }

    async fn tags(&self) -> Result<Vec<Tag>, DomainError> {
        let tags: Vec<String> = sqlx::query_scalar("SELECT DISTINCT tag FROM article_tags ORDER BY tag")
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("list tags"))?;

        Ok(tags.into_iter().map(Tag::new_without_validation).collect())
    }
}

/// OFFSET takes a BIGINT; anything past it skips every row anyway
fn sql_offset(offset: Offset) -> i64 {
    i64::try_from(offset.value()).unwrap_or(i64::MAX)
}

fn row_to_article(row: &PgRow) -> Result<CreatedArticle, DomainError> {
    let id: i64 = row.try_get("id").map_err(read_error("read article id"))?;
    let slug: String = row.try_get("slug").map_err(read_error("read slug"))?;
    let title: String = row.try_get("title").map_err(read_error("read title"))?;
    let description: String = row
        .try_get("description")
        .map_err(read_error("read description"))?;
    let body: String = row.try_get("body").map_err(read_error("read body"))?;
    let author_id: i64 = row
        .try_get("author_id")
        .map_err(read_error("read author id"))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(read_error("read created_at"))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(read_error("read updated_at"))?;
    let tag_list: Vec<String> = row
        .try_get("tag_list")
        .map_err(read_error("read tag list"))?;
    let favorites_count: i64 = row
        .try_get("favorites_count")
        .map_err(read_error("read favorites count"))?;
    let favorited: bool = row
        .try_get("favorited")
        .map_err(read_error("read favorited"))?;

    Ok(CreatedArticle {
        id: ArticleId::new(id),
        slug: Slug::new_without_validation(slug),
        title: Title::new_without_validation(title),
        description: Description::new_without_validation(description),
        body: ArticleBody::new_without_validation(body),
        tag_list: tag_list.into_iter().map(Tag::new_without_validation).collect(),
        created_at,
        updated_at,
        favorited,
        favorites_count: favorites_count as u64,
        author_id: UserId::new(author_id),
        author: row_to_profile(row)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_numbers_parameters() {
        let filter = list_filter(2);

        assert!(filter.contains("$2::TEXT IS NULL"));
        assert!(filter.contains("u.username = $3"));
        assert!(filter.contains("fu.username = $4"));
        assert!(!filter.contains("$1"));
    }

    #[test]
    fn test_article_view_binds_viewer_first() {
        assert!(ARTICLE_VIEW.contains("f.user_id = $1"));
        assert!(ARTICLE_VIEW.contains("fo.follower_id = $1"));
        assert!(!ARTICLE_VIEW.contains("$2"));
    }
}
