//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{RegisteredUser, UnregisteredUser, UserId, UserUpdate};
use super::values::Email;
use crate::domain::DomainError;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by id; `Ok(None)` when no such user exists
    async fn find_by_user_id(&self, user_id: UserId)
        -> Result<Option<RegisteredUser>, DomainError>;

    /// Get a user and their stored password hash by email (for login)
    async fn find_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(RegisteredUser, String)>, DomainError>;

    /// Store a new user. Fails with `Conflict` when the email or username is taken.
    async fn register(
        &self,
        user: &UnregisteredUser,
        password_hash: &str,
    ) -> Result<RegisteredUser, DomainError>;

    /// Apply a partial update. `password_hash` replaces the stored hash when present.
    async fn update(
        &self,
        user_id: UserId,
        update: &UserUpdate,
        password_hash: Option<String>,
    ) -> Result<RegisteredUser, DomainError>;
}
