//! In-memory article repository implementation

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::UserId;
use crate::domain::{
    ArticleFilter, ArticlePage, ArticleRepository, ArticleUpdate, CreatedArticle, DomainError,
    Limit, Offset, Slug, Tag, UncreatedArticle,
};
use crate::infrastructure::storage::{ArticleRecord, InMemoryDatabase, Tables};

pub(crate) const SLUG_TAKEN: &str = "slug has already been taken";

/// In-memory implementation of ArticleRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleRepository {
    db: InMemoryDatabase,
}

impl InMemoryArticleRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

/// Newest first, ties broken by insertion order
fn newest_first<'a>(
    tables: &'a Tables,
    mut keep: impl FnMut(&ArticleRecord) -> bool,
) -> Vec<&'a ArticleRecord> {
    let mut articles: Vec<_> = tables.articles.values().filter(|a| keep(a)).collect();
    articles.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    articles
}

fn page(
    tables: &Tables,
    matching: Vec<&ArticleRecord>,
    limit: Limit,
    offset: Offset,
    viewer: Option<i64>,
) -> ArticlePage {
    let articles_count = matching.len() as u64;
    let articles = matching
        .into_iter()
        .skip(usize::try_from(offset.value()).unwrap_or(usize::MAX))
        .take(limit.value() as usize)
        .filter_map(|a| tables.article_view(a, viewer))
        .collect();

    ArticlePage {
        articles,
        articles_count,
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list(
        &self,
        filter: &ArticleFilter,
        viewer: Option<UserId>,
    ) -> Result<ArticlePage, DomainError> {
        let tables = self.db.read().await;

        let author = filter
            .author
            .as_ref()
            .map(|name| tables.user_by_username(name.as_str()).map(|u| u.id));
        let favorited_by = filter
            .favorited_by
            .as_ref()
            .map(|name| tables.user_by_username(name.as_str()).map(|u| u.id));

        let matching = newest_first(&tables, |article| {
            let tag_matches = filter
                .tag
                .as_ref()
                .is_none_or(|tag| article.tags.iter().any(|t| t == tag.as_str()));
            let author_matches = author.is_none_or(|id| id == Some(article.author_id));
            let favorite_matches = favorited_by.is_none_or(|id| {
                id.is_some_and(|user| tables.favorites.contains(&(user, article.id)))
            });

            tag_matches && author_matches && favorite_matches
        });

        Ok(page(
            &tables,
            matching,
            filter.limit,
            filter.offset,
            viewer.map(|v| v.value()),
        ))
    }

    async fn feed(
        &self,
        viewer: UserId,
        limit: Limit,
        offset: Offset,
    ) -> Result<ArticlePage, DomainError> {
        let tables = self.db.read().await;
        let viewer = viewer.value();

        let matching = newest_first(&tables, |article| {
            tables.follows.contains(&(viewer, article.author_id))
        });

        Ok(page(&tables, matching, limit, offset, Some(viewer)))
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
        viewer: Option<UserId>,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .article_by_slug(slug.as_str())
            .and_then(|a| tables.article_view(a, viewer.map(|v| v.value()))))
    }

    async fn create(
        &self,
        slug: &Slug,
        article: &UncreatedArticle,
        author: UserId,
    ) -> Result<CreatedArticle, DomainError> {
        let mut tables = self.db.write().await;

        if tables.article_by_slug(slug.as_str()).is_some() {
            return Err(DomainError::conflict(SLUG_TAKEN));
        }

        let now = Utc::now();
        let record = ArticleRecord {
            id: tables.next_article_id(),
            slug: slug.to_string(),
            title: article.title().to_string(),
            description: article.description().to_string(),
            body: article.body().to_string(),
            tags: article.tag_list().iter().map(|t| t.to_string()).collect(),
            author_id: author.value(),
            created_at: now,
            updated_at: now,
        };

        let created = tables
            .article_view(&record, Some(author.value()))
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", author)))?;
        tables.articles.insert(record.id, record);

        Ok(created)
    }

    async fn update(
        &self,
        slug: &Slug,
        update: &ArticleUpdate,
        viewer: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(record) = tables
            .articles
            .values_mut()
            .find(|a| a.slug == slug.as_str())
        else {
            return Ok(None);
        };

        if let Some(title) = &update.title {
            record.title = title.to_string();
        }
        if let Some(description) = &update.description {
            record.description = description.to_string();
        }
        if let Some(body) = &update.body {
            record.body = body.to_string();
        }
        record.updated_at = Utc::now();

        let record = record.clone();
        Ok(tables.article_view(&record, Some(viewer.value())))
    }

    async fn delete(&self, slug: &Slug) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let Some(id) = tables.article_by_slug(slug.as_str()).map(|a| a.id) else {
            return Ok(false);
        };

        tables.articles.remove(&id);
        tables.favorites.retain(|(_, article)| *article != id);
        tables.comments.retain(|_, c| c.article_id != id);

        Ok(true)
    }

    async fn favorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(article) = tables.article_by_slug(slug.as_str()).cloned() else {
            return Ok(None);
        };
        tables.favorites.insert((user.value(), article.id));

        Ok(tables.article_view(&article, Some(user.value())))
    }

    async fn unfavorite(
        &self,
        slug: &Slug,
        user: UserId,
    ) -> Result<Option<CreatedArticle>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(article) = tables.article_by_slug(slug.as_str()).cloned() else {
            return Ok(None);
        };
        tables.favorites.remove(&(user.value(), article.id));

        Ok(tables.article_view(&article, Some(user.value())))
    }

    async fn tags(&self) -> Result<Vec<Tag>, DomainError> {
        let tables = self.db.read().await;

        let distinct: BTreeSet<&str> = tables
            .articles
            .values()
            .flat_map(|a| a.tags.iter().map(String::as_str))
            .collect();

        Ok(distinct
            .into_iter()
            .map(Tag::new_without_validation)
            .collect())
    }
}
