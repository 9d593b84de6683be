//! Article endpoints: listing, feed, CRUD and favorites

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{OptionalUser, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{ArticlePage, CreatedArticle, Tag};
use crate::infrastructure::article::{
    ListArticlesQuery, NewArticleRequest, UpdateArticleRequest,
};

/// Query parameters of `GET /api/articles`. Kept as raw strings so
/// malformed values surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArticlesParams {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl From<ListArticlesParams> for ListArticlesQuery {
    fn from(params: ListArticlesParams) -> Self {
        Self {
            tag: params.tag,
            author: params.author,
            favorited: params.favorited,
            limit: params.limit,
            offset: params.offset,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRequestEnvelope<T> {
    pub article: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateArticleApiRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateArticleApiRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleEnvelope {
    pub article: CreatedArticle,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<Tag>,
}

/// GET /api/articles
pub async fn list_articles(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Query(params): Query<ListArticlesParams>,
) -> Result<Json<ArticlePage>, ApiError> {
    debug!(?params, "Listing articles");

    let page = state
        .article_service
        .list(params.into(), viewer.user())
        .await?;

    Ok(Json(page))
}

/// GET /api/articles/feed
pub async fn feed(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<ArticlePage>, ApiError> {
    let page = state
        .article_service
        .feed(
            params.limit.as_deref(),
            params.offset.as_deref(),
            &authorized.user,
        )
        .await?;

    Ok(Json(page))
}

/// GET /api/articles/{slug}
pub async fn get_article(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let article = state.article_service.get(&slug, viewer.user()).await?;

    Ok(Json(ArticleEnvelope { article }))
}

/// POST /api/articles
pub async fn create_article(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Json(request): Json<ArticleRequestEnvelope<CreateArticleApiRequest>>,
) -> Result<(StatusCode, Json<ArticleEnvelope>), ApiError> {
    let request = request.article;
    debug!(title = ?request.title, "Creating article");

    let service_request = NewArticleRequest {
        title: request.title,
        description: request.description,
        body: request.body,
        tag_list: request.tag_list,
    };

    let article = state
        .article_service
        .create(service_request, &authorized.user)
        .await?;

    Ok((StatusCode::CREATED, Json(ArticleEnvelope { article })))
}

/// PUT /api/articles/{slug}
pub async fn update_article(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(slug): Path<String>,
    Json(request): Json<ArticleRequestEnvelope<UpdateArticleApiRequest>>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let request = request.article;

    let service_request = UpdateArticleRequest {
        title: request.title,
        description: request.description,
        body: request.body,
    };

    let article = state
        .article_service
        .update(&slug, service_request, &authorized.user)
        .await?;

    Ok(Json(ArticleEnvelope { article }))
}

/// DELETE /api/articles/{slug}
pub async fn delete_article(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .article_service
        .delete(&slug, &authorized.user)
        .await?;

    Ok(StatusCode::OK)
}

/// POST /api/articles/{slug}/favorite
pub async fn favorite(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let article = state
        .article_service
        .favorite(&slug, &authorized.user)
        .await?;

    Ok(Json(ArticleEnvelope { article }))
}

/// DELETE /api/articles/{slug}/favorite
pub async fn unfavorite(
    State(state): State<AppState>,
    RequireUser(authorized): RequireUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let article = state
        .article_service
        .unfavorite(&slug, &authorized.user)
        .await?;

    Ok(Json(ArticleEnvelope { article }))
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>, ApiError> {
    let tags = state.article_service.tags().await?;

    Ok(Json(TagsResponse { tags }))
}
