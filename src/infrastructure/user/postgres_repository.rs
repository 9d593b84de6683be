//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::repository::{EMAIL_TAKEN, USERNAME_TAKEN};
use crate::domain::user::{
    Bio, Email, Image, RegisteredUser, UnregisteredUser, UserId, UserRepository, UserUpdate,
    Username,
};
use crate::domain::DomainError;
use crate::infrastructure::storage::{map_write_error, read_error};

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<RegisteredUser>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, bio, image
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("get user"))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(RegisteredUser, String)>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, bio, image, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("get user by email"))?;

        match row {
            Some(row) => {
                let hash: String = row
                    .try_get("password_hash")
                    .map_err(read_error("read password hash"))?;
                Ok(Some((row_to_user(&row)?, hash)))
            }
            None => Ok(None),
        }
    }

    async fn register(
        &self,
        user: &UnregisteredUser,
        password_hash: &str,
    ) -> Result<RegisteredUser, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, bio, image
            "#,
        )
        .bind(user.email().as_str())
        .bind(user.username().as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create user", conflict_for_constraint))?;

        row_to_user(&row)
    }

    async fn update(
        &self,
        user_id: UserId,
        update: &UserUpdate,
        password_hash: Option<String>,
    ) -> Result<RegisteredUser, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                username = COALESCE($3, username),
                bio = COALESCE($4, bio),
                image = COALESCE($5, image),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, bio, image
            "#,
        )
        .bind(user_id.value())
        .bind(update.email.as_ref().map(|v| v.as_str()))
        .bind(update.username.as_ref().map(|v| v.as_str()))
        .bind(update.bio.as_ref().map(|v| v.as_str()))
        .bind(update.image.as_ref().map(|v| v.as_str()))
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update user", conflict_for_constraint))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(format!("User {} not found", user_id))),
        }
    }
}

fn conflict_for_constraint(constraint: &str) -> DomainError {
    if constraint.contains("username") {
        DomainError::conflict(USERNAME_TAKEN)
    } else {
        DomainError::conflict(EMAIL_TAKEN)
    }
}

/// Map a row with `id, email, username, bio, image` columns
fn row_to_user(row: &PgRow) -> Result<RegisteredUser, DomainError> {
    let id: i64 = row.try_get("id").map_err(read_error("read user id"))?;
    let email: String = row.try_get("email").map_err(read_error("read user email"))?;
    let username: String = row
        .try_get("username")
        .map_err(read_error("read username"))?;
    let bio: String = row.try_get("bio").map_err(read_error("read user bio"))?;
    let image: String = row.try_get("image").map_err(read_error("read user image"))?;

    Ok(RegisteredUser::new(
        UserId::new(id),
        Email::new_without_validation(email),
        Username::new_without_validation(username),
        Bio::new_without_validation(bio),
        Image::new_without_validation(image),
    ))
}
