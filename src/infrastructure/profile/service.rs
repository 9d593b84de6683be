//! Profile service: viewing profiles and following users

use std::sync::Arc;

use tracing::debug;

use crate::domain::user::{RegisteredUser, Username};
use crate::domain::{DomainError, Profile, ProfileRepository};

pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService").finish_non_exhaustive()
    }
}

/// A username that fails validation cannot belong to anyone
fn parse_username(username: &str) -> Result<Username, DomainError> {
    Username::new(Some(username)).map_err(|_| profile_not_found(username))
}

fn profile_not_found(username: &str) -> DomainError {
    DomainError::not_found(format!("profile '{}' not found", username))
}

impl ProfileService {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(
        &self,
        username: &str,
        viewer: Option<&RegisteredUser>,
    ) -> Result<Profile, DomainError> {
        let parsed = parse_username(username)?;

        self.repository
            .find_by_username(&parsed, viewer.map(|v| v.user_id()))
            .await?
            .ok_or_else(|| profile_not_found(username))
    }

    pub async fn follow(
        &self,
        username: &str,
        follower: &RegisteredUser,
    ) -> Result<Profile, DomainError> {
        let parsed = parse_username(username)?;

        if &parsed == follower.username() {
            return Err(DomainError::conflict("cannot follow yourself"));
        }

        let profile = self
            .repository
            .follow(&parsed, follower.user_id())
            .await?
            .ok_or_else(|| profile_not_found(username))?;

        debug!(follower = %follower.user_id(), followee = %parsed, "Followed user");

        Ok(profile)
    }

    pub async fn unfollow(
        &self,
        username: &str,
        follower: &RegisteredUser,
    ) -> Result<Profile, DomainError> {
        let parsed = parse_username(username)?;

        let profile = self
            .repository
            .unfollow(&parsed, follower.user_id())
            .await?
            .ok_or_else(|| profile_not_found(username))?;

        debug!(follower = %follower.user_id(), followee = %parsed, "Unfollowed user");

        Ok(profile)
    }
}
