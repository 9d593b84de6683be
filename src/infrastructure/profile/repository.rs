//! In-memory profile repository implementation

use async_trait::async_trait;

use crate::domain::user::{UserId, Username};
use crate::domain::{DomainError, Profile, ProfileRepository};
use crate::infrastructure::storage::InMemoryDatabase;

/// In-memory implementation of ProfileRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    db: InMemoryDatabase,
}

impl InMemoryProfileRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_username(
        &self,
        username: &Username,
        viewer: Option<UserId>,
    ) -> Result<Option<Profile>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .user_by_username(username.as_str())
            .and_then(|u| tables.profile(u.id, viewer.map(|v| v.value()))))
    }

    async fn follow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(followee) = tables.user_by_username(username.as_str()).map(|u| u.id) else {
            return Ok(None);
        };
        tables.follows.insert((follower.value(), followee));

        Ok(tables.profile(followee, Some(follower.value())))
    }

    async fn unfollow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(followee) = tables.user_by_username(username.as_str()).map(|u| u.id) else {
            return Ok(None);
        };
        tables.follows.remove(&(follower.value(), followee));

        Ok(tables.profile(followee, Some(follower.value())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UnregisteredUser, UserRepository};
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn setup() -> (InMemoryProfileRepository, UserId, UserId) {
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

        (
            InMemoryProfileRepository::new(db),
            jake.user_id(),
            anna.user_id(),
        )
    }

    fn username(value: &str) -> Username {
        Username::new_without_validation(value)
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let (repo, _, anna) = setup().await;

        let profile = repo
            .find_by_username(&username("jakejake"), Some(anna))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.username().as_str(), "jakejake");
        assert!(!profile.following());

        assert!(repo
            .find_by_username(&username("nobody"), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let (repo, _, anna) = setup().await;

        let followed = repo.follow(&username("jakejake"), anna).await.unwrap().unwrap();
        assert!(followed.following());

        // following twice is a no-op
        let again = repo.follow(&username("jakejake"), anna).await.unwrap().unwrap();
        assert!(again.following());

        let anonymous = repo
            .find_by_username(&username("jakejake"), None)
            .await
            .unwrap()
            .unwrap();
        assert!(!anonymous.following());

        let unfollowed = repo
            .unfollow(&username("jakejake"), anna)
            .await
            .unwrap()
            .unwrap();
        assert!(!unfollowed.following());
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let (repo, jake, _) = setup().await;

        assert!(repo.follow(&username("nobody"), jake).await.unwrap().is_none());
        assert!(repo.unfollow(&username("nobody"), jake).await.unwrap().is_none());
    }
}
