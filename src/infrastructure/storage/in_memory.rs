//! In-memory database shared by the in-memory repositories
//!
//! Useful for testing and development. Data is lost when the process terminates.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::article::{ArticleBody, ArticleId, Description, Title};
use crate::domain::comment::{Body, CommentId};
use crate::domain::user::{Bio, Email, Image, UserId, Username};
use crate::domain::{Comment, CreatedArticle, Profile, RegisteredUser, Slug, Tag};

#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub bio: String,
    pub image: String,
}

impl UserRecord {
    pub fn to_user(&self) -> RegisteredUser {
        RegisteredUser::new(
            UserId::new(self.id),
            Email::new_without_validation(self.email.as_str()),
            Username::new_without_validation(self.username.as_str()),
            Bio::new_without_validation(self.bio.as_str()),
            Image::new_without_validation(self.image.as_str()),
        )
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArticleRecord {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentRecord {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All tables of the in-memory database
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<i64, UserRecord>,
    /// (follower, followee)
    pub follows: HashSet<(i64, i64)>,
    pub articles: BTreeMap<i64, ArticleRecord>,
    /// (user, article)
    pub favorites: HashSet<(i64, i64)>,
    pub comments: BTreeMap<i64, CommentRecord>,
    last_user_id: i64,
    last_article_id: i64,
    last_comment_id: i64,
}

impl Tables {
    pub fn next_user_id(&mut self) -> i64 {
        self.last_user_id += 1;
        self.last_user_id
    }

    pub fn next_article_id(&mut self) -> i64 {
        self.last_article_id += 1;
        self.last_article_id
    }

    pub fn next_comment_id(&mut self) -> i64 {
        self.last_comment_id += 1;
        self.last_comment_id
    }

    pub fn user_by_username(&self, username: &str) -> Option<&UserRecord> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn article_by_slug(&self, slug: &str) -> Option<&ArticleRecord> {
        self.articles.values().find(|a| a.slug == slug)
    }

    pub fn is_following(&self, follower: Option<i64>, followee: i64) -> bool {
        follower.is_some_and(|f| self.follows.contains(&(f, followee)))
    }

    pub fn profile(&self, user_id: i64, viewer: Option<i64>) -> Option<Profile> {
        let user = self.users.get(&user_id)?;
        Some(Profile::of(&user.to_user(), self.is_following(viewer, user_id)))
    }

    pub fn article_view(
        &self,
        article: &ArticleRecord,
        viewer: Option<i64>,
    ) -> Option<CreatedArticle> {
        let author = self.profile(article.author_id, viewer)?;
        let favorites_count = self
            .favorites
            .iter()
            .filter(|(_, article_id)| *article_id == article.id)
            .count() as u64;
        let favorited = viewer.is_some_and(|v| self.favorites.contains(&(v, article.id)));

        Some(CreatedArticle {
            id: ArticleId::new(article.id),
            slug: Slug::new_without_validation(article.slug.as_str()),
            title: Title::new_without_validation(article.title.as_str()),
            description: Description::new_without_validation(article.description.as_str()),
            body: ArticleBody::new_without_validation(article.body.as_str()),
            tag_list: article
                .tags
                .iter()
                .map(|t| Tag::new_without_validation(t.as_str()))
                .collect(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            favorited,
            favorites_count,
            author_id: UserId::new(article.author_id),
            author,
        })
    }

    pub fn comment_view(&self, comment: &CommentRecord, viewer: Option<i64>) -> Option<Comment> {
        let author = self.profile(comment.author_id, viewer)?;

        Some(Comment {
            id: CommentId::new_without_validation(comment.id),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            body: Body::new_without_validation(comment.body.as_str()),
            author_id: UserId::new(comment.author_id),
            author,
        })
    }
}

/// Handle to the in-memory tables; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id,
            email: format!("{}@example.com", username),
            username: username.to_string(),
            password_hash: String::new(),
            bio: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_sequences_start_at_one() {
        let mut tables = Tables::default();

        assert_eq!(tables.next_user_id(), 1);
        assert_eq!(tables.next_user_id(), 2);
        assert_eq!(tables.next_article_id(), 1);
        assert_eq!(tables.next_comment_id(), 1);
    }

    #[test]
    fn test_profile_following() {
        let mut tables = Tables::default();
        tables.users.insert(1, user(1, "jake"));
        tables.users.insert(2, user(2, "anna"));
        tables.follows.insert((2, 1));

        assert!(tables.profile(1, Some(2)).unwrap().following());
        assert!(!tables.profile(1, None).unwrap().following());
        assert!(!tables.profile(2, Some(1)).unwrap().following());
        assert!(tables.profile(3, None).is_none());
    }

    #[test]
    fn test_article_view_counts_favorites() {
        let mut tables = Tables::default();
        tables.users.insert(1, user(1, "jake"));
        tables.users.insert(2, user(2, "anna"));

        let now = Utc::now();
        let article = ArticleRecord {
            id: 1,
            slug: "hello-abc123".to_string(),
            title: "Hello".to_string(),
            description: String::new(),
            body: "body".to_string(),
            tags: vec!["rust".to_string()],
            author_id: 1,
            created_at: now,
            updated_at: now,
        };
        tables.favorites.insert((1, 1));
        tables.favorites.insert((2, 1));

        let view = tables.article_view(&article, Some(2)).unwrap();
        assert_eq!(view.favorites_count, 2);
        assert!(view.favorited);
        assert_eq!(view.tag_list[0].as_str(), "rust");

        let anonymous = tables.article_view(&article, None).unwrap();
        assert!(!anonymous.favorited);
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let db = InMemoryDatabase::new();
        let other = db.clone();

        db.write().await.users.insert(1, user(1, "jake"));

        assert!(other.read().await.user_by_username("jake").is_some());
    }
}
