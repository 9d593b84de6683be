//! Bearer token extractors

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::auth::Authorized;

/// Extractor that requires a valid `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct RequireUser(pub Authorized);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorized = state
            .authorizer
            .authorize(authorization_header(&parts.headers))
            .await?;

        Ok(RequireUser(authorized))
    }
}

/// Extractor for endpoints that personalize their output when a user is present.
/// No header means anonymous; a header that fails authorization is rejected.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Authorized>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = authorization_header(&parts.headers) else {
            return Ok(OptionalUser(None));
        };

        let authorized = state.authorizer.authorize(Some(header)).await?;

        Ok(OptionalUser(Some(authorized)))
    }
}

impl OptionalUser {
    pub fn user(&self) -> Option<&crate::domain::RegisteredUser> {
        self.0.as_ref().map(|a| &a.user)
    }
}

/// Raw `Authorization` value. Non-UTF-8 values read as empty and fail parsing.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}
