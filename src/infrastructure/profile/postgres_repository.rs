//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::user::{Bio, Image, UserId, Username};
use crate::domain::{DomainError, Profile, ProfileRepository};
use crate::infrastructure::storage::read_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Debug, Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_username(
        &self,
        username: &Username,
        viewer: Option<UserId>,
    ) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT u.username, u.bio, u.image,
                   EXISTS(
                       SELECT 1 FROM follows f
                       WHERE f.followee_id = u.id AND f.follower_id = $2
                   ) AS following
            FROM users u
            WHERE u.username = $1
            "#,
        )
        .bind(username.as_str())
        .bind(viewer.map(|v| v.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("get profile"))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn follow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            SELECT $2, id FROM users WHERE username = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(username.as_str())
        .bind(follower.value())
        .execute(&self.pool)
        .await
        .map_err(read_error("follow user"))?;

        self.find_by_username(username, Some(follower)).await
    }

    async fn unfollow(
        &self,
        username: &Username,
        follower: UserId,
    ) -> Result<Option<Profile>, DomainError> {
        sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $2
              AND followee_id = (SELECT id FROM users WHERE username = $1)
            "#,
        )
        .bind(username.as_str())
        .bind(follower.value())
        .execute(&self.pool)
        .await
        .map_err(read_error("unfollow user"))?;

        self.find_by_username(username, Some(follower)).await
    }
}

/// Map a row with `username, bio, image, following` columns
pub(crate) fn row_to_profile(row: &PgRow) -> Result<Profile, DomainError> {
    let username: String = row
        .try_get("username")
        .map_err(read_error("read username"))?;
    let bio: String = row.try_get("bio").map_err(read_error("read bio"))?;
    let image: String = row.try_get("image").map_err(read_error("read image"))?;
    let following: bool = row
        .try_get("following")
        .map_err(read_error("read following"))?;

    Ok(Profile::new(
        Username::new_without_validation(username),
        Bio::new_without_validation(bio),
        Image::new_without_validation(image),
        following,
    ))
}
