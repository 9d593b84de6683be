//! Comment service

use std::sync::Arc;

use tracing::info;

use crate::domain::comment::Body;
use crate::domain::user::RegisteredUser;
use crate::domain::{Comment, CommentId, CommentRepository, DomainError};
use crate::infrastructure::article::{article_not_found, parse_slug};

pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish_non_exhaustive()
    }
}

fn comment_not_found(id: CommentId) -> DomainError {
    DomainError::not_found(format!("comment {} not found", id))
}

impl CommentService {
    pub fn new(repository: Arc<dyn CommentRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        slug: &str,
        viewer: Option<&RegisteredUser>,
    ) -> Result<Vec<Comment>, DomainError> {
        let parsed = parse_slug(slug)?;

        self.repository
            .list(&parsed, viewer.map(|v| v.user_id()))
            .await?
            .ok_or_else(|| article_not_found(slug))
    }

    pub async fn add(
        &self,
        slug: &str,
        body: Option<&str>,
        author: &RegisteredUser,
    ) -> Result<Comment, DomainError> {
        let parsed = parse_slug(slug)?;
        let body = Body::new(body)?;

        let comment = self
            .repository
            .create(&parsed, &body, author.user_id())
            .await?
            .ok_or_else(|| article_not_found(slug))?;

        info!(slug = %parsed, comment_id = %comment.id, "Comment added");

        Ok(comment)
    }

    /// Only the comment's author may delete it
    pub async fn delete(
        &self,
        slug: &str,
        id: &str,
        user: &RegisteredUser,
    ) -> Result<(), DomainError> {
        let parsed = parse_slug(slug)?;
        let id = CommentId::new(Some(id))?;

        let comment = self
            .repository
            .find(&parsed, id)
            .await?
            .ok_or_else(|| comment_not_found(id))?;

        if !comment.is_written_by(user.user_id()) {
            return Err(DomainError::forbidden("only the author can delete a comment"));
        }

        if !self.repository.delete(&parsed, id).await? {
            return Err(comment_not_found(id));
        }

        info!(slug = %parsed, comment_id = %id, "Comment deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleRepository, Slug, UncreatedArticle, UnregisteredUser, UserRepository};
    use crate::infrastructure::article::InMemoryArticleRepository;
    use crate::infrastructure::comment::InMemoryCommentRepository;
    use crate::infrastructure::storage::InMemoryDatabase;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        service: CommentService,
        jake: RegisteredUser,
        anna: RegisteredUser,
    }

    async fn setup() -> Fixture {
        let db = InMemoryDatabase::new();
        let users = InMemoryUserRepository::new(db.clone());

        let mut registered = Vec::new();
        for (email, name) in [("jake@jake.jake", "jakejake"), ("anna@anna.anna", "annaanna")] {
            registered.push(
                users
                    .register(
                        &UnregisteredUser::new(Some(email), Some(name), Some("password")).unwrap(),
                        "hash",
                    )
                    .await
                    .unwrap(),
            );
        }
        let anna = registered.pop().unwrap();
        let jake = registered.pop().unwrap();

        let article =
            UncreatedArticle::new::<&str>(Some("Dragons"), Some(""), Some("body"), &[]).unwrap();
        InMemoryArticleRepository::new(db.clone())
            .create(&Slug::new_without_validation("dragons"), &article, jake.user_id())
            .await
            .unwrap();

        Fixture {
            service: CommentService::new(Arc::new(InMemoryCommentRepository::new(db))),
            jake,
            anna,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let fixture = setup().await;

        let comment = fixture
            .service
            .add("dragons", Some("Thank you so much!"), &fixture.anna)
            .await
            .unwrap();
        assert_eq!(comment.body.as_str(), "Thank you so much!");

        let comments = fixture.service.list("dragons", None).await.unwrap();
        assert_eq!(comments.len(), 1);
    }

    #[tokio::test]
    async fn test_add_requires_body() {
        let fixture = setup().await;

        assert!(matches!(
            fixture.service.add("dragons", None, &fixture.anna).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_article() {
        let fixture = setup().await;

        assert!(matches!(
            fixture.service.list("missing", None).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            fixture.service.add("missing", Some("hi"), &fixture.anna).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let fixture = setup().await;
        let comment = fixture
            .service
            .add("dragons", Some("mine"), &fixture.anna)
            .await
            .unwrap();
        let id = comment.id.to_string();

        assert!(matches!(
            fixture.service.delete("dragons", "abc", &fixture.anna).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            fixture.service.delete("dragons", "0", &fixture.anna).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            fixture.service.delete("dragons", "999", &fixture.anna).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            fixture.service.delete("dragons", &id, &fixture.jake).await,
            Err(DomainError::Forbidden { .. })
        ));

        fixture
            .service
            .delete("dragons", &id, &fixture.anna)
            .await
            .unwrap();
        assert!(fixture.service.list("dragons", None).await.unwrap().is_empty());
    }
}
