//! Article service: listing, feed, authoring and favorites

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{RegisteredUser, Username};
use crate::domain::validation::{optional, zip, zip3};
use crate::domain::{
    ArticleFilter, ArticlePage, ArticleRepository, ArticleUpdate, CreatedArticle, DomainError,
    Limit, Offset, Slug, Tag, UncreatedArticle,
};

/// Slug generation is retried this many times on a collision
const SLUG_ATTEMPTS: usize = 3;

/// Raw query parameters of the article list
#[derive(Debug, Clone, Default)]
pub struct ListArticlesQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Raw fields of a new article
#[derive(Debug, Clone, Default)]
pub struct NewArticleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Vec<String>,
}

/// Raw fields of an article update; absent fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

pub struct ArticleService {
    repository: Arc<dyn ArticleRepository>,
}

impl std::fmt::Debug for ArticleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleService").finish_non_exhaustive()
    }
}

pub(crate) fn parse_slug(slug: &str) -> Result<Slug, DomainError> {
    Slug::new(Some(slug)).map_err(|_| article_not_found(slug))
}

pub(crate) fn article_not_found(slug: &str) -> DomainError {
    DomainError::not_found(format!("article '{}' not found", slug))
}

fn pagination(limit: Option<&str>, offset: Option<&str>) -> Result<(Limit, Offset), DomainError> {
    Ok(zip(Limit::new(limit), Offset::new(offset))?)
}

impl ArticleService {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        query: ListArticlesQuery,
        viewer: Option<&RegisteredUser>,
    ) -> Result<ArticlePage, DomainError> {
        let ((tag, author, favorited_by), (limit, offset)) = zip(
            zip3(
                optional(query.tag.as_deref(), Tag::new),
                optional(query.author.as_deref(), Username::new),
                optional(query.favorited.as_deref(), Username::new),
            ),
            zip(
                Limit::new(query.limit.as_deref()),
                Offset::new(query.offset.as_deref()),
            ),
        )?;

        let filter = ArticleFilter {
            tag,
            author,
            favorited_by,
            limit,
            offset,
        };

        self.repository
            .list(&filter, viewer.map(|v| v.user_id()))
            .await
    }

    pub async fn feed(
        &self,
        limit: Option<&str>,
        offset: Option<&str>,
        viewer: &RegisteredUser,
    ) -> Result<ArticlePage, DomainError> {
        let (limit, offset) = pagination(limit, offset)?;

        self.repository.feed(viewer.user_id(), limit, offset).await
    }

    pub async fn get(
        &self,
        slug: &str,
        viewer: Option<&RegisteredUser>,
    ) -> Result<CreatedArticle, DomainError> {
        let parsed = parse_slug(slug)?;

        self.repository
            .find_by_slug(&parsed, viewer.map(|v| v.user_id()))
            .await?
            .ok_or_else(|| article_not_found(slug))
    }

    pub async fn create(
        &self,
        request: NewArticleRequest,
        author: &RegisteredUser,
    ) -> Result<CreatedArticle, DomainError> {
        let article = UncreatedArticle::new(
            request.title.as_deref(),
            request.description.as_deref(),
            request.body.as_deref(),
            &request.tag_list,
        )?;

        let mut attempt = 1;
        loop {
            let slug = Slug::generate(article.title());

            match self
                .repository
                .create(&slug, &article, author.user_id())
                .await
            {
                Ok(created) => {
                    info!(slug = %created.slug, author = %author.user_id(), "Article created");
                    return Ok(created);
                }
                Err(DomainError::Conflict { .. }) if attempt < SLUG_ATTEMPTS => {
                    warn!(slug = %slug, attempt, "Slug collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn update(
        &self,
        slug: &str,
        request: UpdateArticleRequest,
        user: &RegisteredUser,
    ) -> Result<CreatedArticle, DomainError> {
        let parsed = self.authored_by(slug, user).await?;

        let update = ArticleUpdate::new(
            request.title.as_deref(),
            request.description.as_deref(),
            request.body.as_deref(),
        )?;

        let updated = self
            .repository
            .update(&parsed, &update, user.user_id())
            .await?
            .ok_or_else(|| article_not_found(slug))?;

        debug!(slug = %parsed, "Article updated");

        Ok(updated)
    }

    pub async fn delete(&self, slug: &str, user: &RegisteredUser) -> Result<(), DomainError> {
        let parsed = self.authored_by(slug, user).await?;

        if !self.repository.delete(&parsed).await? {
            return Err(article_not_found(slug));
        }

        info!(slug = %parsed, "Article deleted");

        Ok(())
    }

    pub async fn favorite(
        &self,
        slug: &str,
        user: &RegisteredUser,
    ) -> Result<CreatedArticle, DomainError> {
        let parsed = parse_slug(slug)?;

        self.repository
            .favorite(&parsed, user.user_id())
            .await?
            .ok_or_else(|| article_not_found(slug))
    }

    pub async fn unfavorite(
        &self,
        slug: &str,
        user: &RegisteredUser,
    ) -> Result<CreatedArticle, DomainError> {
        let parsed = parse_slug(slug)?;

        self.repository
            .unfavorite(&parsed, user.user_id())
            .await?
            .ok_or_else(|| article_not_found(slug))
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.repository.tags().await
    }

    /// The parsed slug, if the article exists and `user` wrote it
    async fn authored_by(&self, slug: &str, user: &RegisteredUser) -> Result<Slug, DomainError> {
        let parsed = parse_slug(slug)?;

        let article = self
            .repository
            .find_by_slug(&parsed, Some(user.user_id()))
            .await?
            .ok_or_else(|| article_not_found(slug))?;

        if !article.is_written_by(user.user_id()) {
            return Err(DomainError::forbidden("only the author can change an article"));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UnregisteredUser, UserRepository};
    use crate::infrastructure::article::InMemoryArticleRepository;
    use crate::infrastructure::storage::InMemoryDatabase;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        service: ArticleService,
        jake: RegisteredUser,
        anna: RegisteredUser,
    }

    async fn setup() -> Fixture {
        let db = InMemoryDatabase::new();
        let users = InMemoryUserRepository::new(db.clone());

        let jake = users
            .register(
                &UnregisteredUser::new(Some("jake@jake.jake"), Some("jakejake"), Some("password"))
                    .unwrap(),
                "hash",
            )
            .await
            .unwrap();
        let anna = users
            .register(
                &UnregisteredUser::new(Some("anna@anna.anna"), Some("annaanna"), Some("password"))
                    .unwrap(),
                "hash",
            )
            .await
            .unwrap();

        Fixture {
            service: ArticleService::new(Arc::new(InMemoryArticleRepository::new(db))),
            jake,
            anna,
        }
    }

    fn dragons() -> NewArticleRequest {
        NewArticleRequest {
            title: Some("How to train your dragon".to_string()),
            description: Some("Ever wonder how?".to_string()),
            body: Some("You have to believe".to_string()),
            tag_list: vec!["dragons".to_string(), "training".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let fixture = setup().await;

        let created = fixture.service.create(dragons(), &fixture.jake).await.unwrap();

        assert!(created.slug.as_str().starts_with("how-to-train-your-dragon-"));
        assert_eq!(created.author.username().as_str(), "jakejake");

        let fetched = fixture
            .service
            .get(created.slug.as_str(), None)
            .await
            .unwrap();
        assert_eq!(fetched.title.as_str(), "How to train your dragon");
    }

    #[tokio::test]
    async fn test_create_reports_every_invalid_field() {
        let fixture = setup().await;

        let request = NewArticleRequest {
            tag_list: vec![String::new()],
            ..Default::default()
        };
        let result = fixture.service.create(request, &fixture.jake).await;

        match result {
            Err(DomainError::Validation(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_only_author_can_update_or_delete() {
        let fixture = setup().await;
        let created = fixture.service.create(dragons(), &fixture.jake).await.unwrap();
        let slug = created.slug.as_str();

        let request = UpdateArticleRequest {
            body: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fixture.service.update(slug, request, &fixture.anna).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(matches!(
            fixture.service.delete(slug, &fixture.anna).await,
            Err(DomainError::Forbidden { .. })
        ));

        let request = UpdateArticleRequest {
            body: Some("With your heart".to_string()),
            ..Default::default()
        };
        let updated = fixture
            .service
            .update(slug, request, &fixture.jake)
            .await
            .unwrap();
        assert_eq!(updated.body.as_str(), "With your heart");

        fixture.service.delete(slug, &fixture.jake).await.unwrap();
        assert!(matches!(
            fixture.service.get(slug, None).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_validates_pagination() {
        let fixture = setup().await;

        let query = ListArticlesQuery {
            limit: Some("0".to_string()),
            offset: Some("-1".to_string()),
            ..Default::default()
        };
        let result = fixture.service.list(query, None).await;

        match result {
            Err(DomainError::Validation(errors)) => {
                let keys: Vec<_> = errors.iter().map(|e| e.key()).collect();
                assert_eq!(keys, vec!["limit", "offset"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_by_tag_and_favorites() {
        let fixture = setup().await;
        let created = fixture.service.create(dragons(), &fixture.jake).await.unwrap();
        fixture
            .service
            .create(
                NewArticleRequest {
                    title: Some("Other".to_string()),
                    description: Some(String::new()),
                    body: Some("text".to_string()),
                    tag_list: vec![],
                },
                &fixture.anna,
            )
            .await
            .unwrap();

        let favorited = fixture
            .service
            .favorite(created.slug.as_str(), &fixture.anna)
            .await
            .unwrap();
        assert!(favorited.favorited);
        assert_eq!(favorited.favorites_count, 1);

        let query = ListArticlesQuery {
            tag: Some("dragons".to_string()),
            ..Default::default()
        };
        let page = fixture.service.list(query, Some(&fixture.anna)).await.unwrap();
        assert_eq!(page.articles_count, 1);
        assert!(page.articles[0].favorited);

        let query = ListArticlesQuery {
            favorited: Some("annaanna".to_string()),
            ..Default::default()
        };
        let page = fixture.service.list(query, None).await.unwrap();
        assert_eq!(page.articles_count, 1);

        let unfavorited = fixture
            .service
            .unfavorite(created.slug.as_str(), &fixture.anna)
            .await
            .unwrap();
        assert_eq!(unfavorited.favorites_count, 0);
    }

    #[tokio::test]
    async fn test_feed_requires_following() {
        let fixture = setup().await;
        fixture.service.create(dragons(), &fixture.jake).await.unwrap();

        let feed = fixture
            .service
            .feed(None, None, &fixture.anna)
            .await
            .unwrap();

        assert_eq!(feed.articles_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let fixture = setup().await;

        assert!(matches!(
            fixture.service.get("no-such-article", None).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            fixture.service.favorite("Not A Slug", &fixture.anna).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_tags() {
        let fixture = setup().await;
        fixture.service.create(dragons(), &fixture.jake).await.unwrap();

        let tags = fixture.service.tags().await.unwrap();

        assert_eq!(tags.len(), 2);
    }
}
