//! User service for registration, login and account updates

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    Email, Password, RegisteredUser, UnregisteredUser, UserRepository, UserUpdate,
};
use crate::domain::validation::zip;
use crate::domain::{DomainError, Session};
use crate::infrastructure::auth::SessionCodec;

use super::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "email or password is invalid";

/// A user together with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: RegisteredUser,
    pub token: String,
}

/// Raw fields of a user update request; absent fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// User service for authentication and account management
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<dyn SessionCodec>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("hasher", &self.hasher)
            .field("codec", &self.codec)
            .finish()
    }
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<dyn SessionCodec>,
    ) -> Self {
        Self {
            repository,
            hasher,
            codec,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthenticatedUser, DomainError> {
        let unregistered = UnregisteredUser::new(email, username, password)?;

        let password_hash = self.hasher.hash(unregistered.password())?;
        let user = self
            .repository
            .register(&unregistered, &password_hash)
            .await?;

        info!(user_id = %user.user_id(), username = %user.username(), "User registered");

        self.sign_in(user)
    }

    /// Check credentials and issue a token
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthenticatedUser, DomainError> {
        let (email, password) = zip(Email::new(email), Password::new(password))?;

        let Some((user, password_hash)) =
            self.repository.find_by_email_with_password(&email).await?
        else {
            debug!("Login attempt for unknown email");
            return Err(DomainError::credential(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(&password, &password_hash) {
            debug!(user_id = %user.user_id(), "Login attempt with wrong password");
            return Err(DomainError::credential(INVALID_CREDENTIALS));
        }

        self.sign_in(user)
    }

    /// Apply a partial update to `user`. A new token is issued because
    /// tokens carrying the old email stop being accepted.
    pub async fn update(
        &self,
        user: &RegisteredUser,
        request: UpdateUserRequest,
    ) -> Result<AuthenticatedUser, DomainError> {
        let update = UserUpdate::new(
            request.email.as_deref(),
            request.username.as_deref(),
            request.password.as_deref(),
            request.bio.as_deref(),
            request.image.as_deref(),
        )?;

        if update.is_empty() {
            return self.sign_in(user.clone());
        }

        let password_hash = update
            .password
            .as_ref()
            .map(|p| self.hasher.hash(p))
            .transpose()?;

        let updated = self
            .repository
            .update(user.user_id(), &update, password_hash)
            .await?;

        info!(user_id = %updated.user_id(), "User updated");

        self.sign_in(updated)
    }

    fn sign_in(&self, user: RegisteredUser) -> Result<AuthenticatedUser, DomainError> {
        let session = Session::new(user.user_id(), user.email().clone());
        let token = self
            .codec
            .encode(&session)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(AuthenticatedUser { user, token })
    }
}
