//! Registration, login and the current user

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::RegisteredUser;
use crate::infrastructure::user::{AuthenticatedUser, UpdateUserRequest};

/// `{"user": {...}}` envelope used by every user endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserApiRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginApiRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Every field is optional; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserApiRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: String,
}

impl UserResponse {
    fn new(user: &RegisteredUser, token: String) -> Self {
        Self {
            email: user.email().to_string(),
            token,
            username: user.username().to_string(),
            bio: user.bio().to_string(),
            image: user.image().to_string(),
        }
    }
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(authenticated: AuthenticatedUser) -> Self {
        Self::new(&authenticated.user, authenticated.token)
    }
}

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<UserEnvelope<RegisterUserApiRequest>>,
) -> Result<(StatusCode, Json<UserEnvelope<UserResponse>>), ApiError> {
    let request = request.user;
    debug!(username = ?request.username, "Registering user");

    let authenticated = state
        .user_service
        .register(
            request.email.as_deref(),
            request.username.as_deref(),
            request.password.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: authenticated.into(),
        }),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<UserEnvelope<LoginApiRequest>>,
) -> Result<Json<UserEnvelope<UserResponse>>, ApiError> {
    let request = request.user;

    let authenticated = state
        .user_service
        .login(request.email.as_deref(), request.password.as_deref())
        .await?;

    Ok(Json(UserEnvelope {
        user: authenticated.into(),
    }))
}

/// GET /api/user
pub async fn current_user(
    RequireUser(authorized): RequireUser,
) -> Json<UserEnvelope<UserResponse>> {
    Json(UserEnvelope {
        user: UserResponse::new(&authorized.user, authorized.token),
    })
}

/// PUT /api/user
pub async fn update_user(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Json(request): Json<UserEnvelope<UpdateUserApiRequest>>,
) -> Result<Json<UserEnvelope<UserResponse>>, ApiError> {
    let request = request.user;
    debug!(user_id = %authorized.user.user_id(), "Updating user");

    let service_request = UpdateUserRequest {
        email: request.email,
        username: request.username,
        password: request.password,
        bio: request.bio,
        image: request.image,
    };

    let authenticated = state
        .user_service
        .update(&authorized.user, service_request)
        .await?;

    Ok(Json(UserEnvelope {
        user: authenticated.into(),
    }))
}
