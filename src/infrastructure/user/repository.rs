//! In-memory user repository implementation

use async_trait::async_trait;

use crate::domain::user::{
    Email, RegisteredUser, UnregisteredUser, UserId, UserRepository, UserUpdate,
};
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables, UserRecord};

pub(crate) const EMAIL_TAKEN: &str = "email has already been taken";
pub(crate) const USERNAME_TAKEN: &str = "username has already been taken";

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    db: InMemoryDatabase,
}

impl InMemoryUserRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

/// Reject an email or username already used by a user other than `except`
fn ensure_unique(
    tables: &Tables,
    email: Option<&str>,
    username: Option<&str>,
    except: Option<i64>,
) -> Result<(), DomainError> {
    let others = || tables.users.values().filter(move |u| Some(u.id) != except);

    if let Some(email) = email {
        if others().any(|u| u.email == email) {
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }
    }

    if let Some(username) = username {
        if others().any(|u| u.username == username) {
            return Err(DomainError::conflict(USERNAME_TAKEN));
        }
    }

    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<RegisteredUser>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.users.get(&user_id.value()).map(UserRecord::to_user))
    }

    async fn find_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(RegisteredUser, String)>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .users
            .values()
            .find(|u| u.email == email.as_str())
            .map(|u| (u.to_user(), u.password_hash.clone())))
    }

    async fn register(
        &self,
        user: &UnregisteredUser,
        password_hash: &str,
    ) -> Result<RegisteredUser, DomainError> {
        let mut tables = self.db.write().await;

        ensure_unique(
            &tables,
            Some(user.email().as_str()),
            Some(user.username().as_str()),
            None,
        )?;

        let record = UserRecord {
            id: tables.next_user_id(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            password_hash: password_hash.to_string(),
            bio: String::new(),
            image: String::new(),
        };
        let registered = record.to_user();
        tables.users.insert(record.id, record);

        Ok(registered)
    }

    async fn update(
        &self,
        user_id: UserId,
        update: &UserUpdate,
        password_hash: Option<String>,
    ) -> Result<RegisteredUser, DomainError> {
        let mut tables = self.db.write().await;

        ensure_unique(
            &tables,
            update.email.as_ref().map(|e| e.as_str()),
            update.username.as_ref().map(|u| u.as_str()),
            Some(user_id.value()),
        )?;

        let record = tables
            .users
            .get_mut(&user_id.value())
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", user_id)))?;

        if let Some(email) = &update.email {
            record.email = email.to_string();
        }
        if let Some(username) = &update.username {
            record.username = username.to_string();
        }
        if let Some(bio) = &update.bio {
            record.bio = bio.to_string();
        }
        if let Some(image) = &update.image {
            record.image = image.to_string();
        }
        if let Some(hash) = password_hash {
            record.password_hash = hash;
        }

        Ok(record.to_user())
    }
}
