//! Comments on an article

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{OptionalUser, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Comment;

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequestEnvelope {
    pub comment: AddCommentApiRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddCommentApiRequest {
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

/// GET /api/articles/{slug}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(slug): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.comment_service.list(&slug, viewer.user()).await?;

    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/articles/{slug}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(slug): Path<String>,
    Json(request): Json<CommentRequestEnvelope>,
) -> Result<(StatusCode, Json<CommentEnvelope>), ApiError> {
    let comment = state
        .comment_service
        .add(&slug, request.comment.body.as_deref(), &authorized.user)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentEnvelope { comment })))
}

/// DELETE /api/articles/{slug}/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .comment_service
        .delete(&slug, &id, &authorized.user)
        .await?;

    Ok(StatusCode::OK)
}
