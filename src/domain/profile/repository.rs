//! Profile repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::Profile;
use crate::domain::user::{UserId, Username};
use crate::domain::DomainError;

/// Repository for profiles and the follow relation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by username, with `following` relative to `viewer`
    async fn find_by_username(
        &self,
        username: &Username,
        viewer: Option<UserId>,
    ) -> Result<Option<Profile>, DomainError>;

    /// Make `follower` follow `username`. Idempotent. `Ok(None)` when the user does not exist.
    async fn follow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError>;

    /// Remove the follow relation. Idempotent. `Ok(None)` when the user does not exist.
    async fn unfollow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError>;
}
