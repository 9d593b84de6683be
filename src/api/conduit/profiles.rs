//! Profile lookup and the follow relation

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::{OptionalUser, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Profile;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

/// GET /api/profiles/{username}
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    debug!(username = %username, "Getting profile");

    let profile = state.profile_service.get(&username, viewer.user()).await?;

    Ok(Json(ProfileEnvelope { profile }))
}

/// POST /api/profiles/{username}/follow
pub async fn follow(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let profile = state
        .profile_service
        .follow(&username, &authorized.user)
        .await?;

    Ok(Json(ProfileEnvelope { profile }))
}

/// DELETE /api/profiles/{username}/follow
pub async fn unfollow(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let profile = state
        .profile_service
        .unfollow(&username, &authorized.user)
        .await?;

    Ok(Json(ProfileEnvelope { profile }))
}
