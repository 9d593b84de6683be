//! Conduit error responses: `{"errors": {"body": [...]}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::DomainError;
use crate::infrastructure::auth::UnauthorizedError;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected error occurred";

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: ApiErrorMessages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorMessages {
    pub body: Vec<String>,
}

/// API error with status code. A `None` response renders an empty body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: Option<ApiErrorResponse>,
}

impl ApiError {
    pub fn new(status: StatusCode, messages: Vec<String>) -> Self {
        Self {
            status,
            response: Some(ApiErrorResponse {
                errors: ApiErrorMessages { body: messages },
            }),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, vec![message.into()])
    }

    /// Bare 401, no body
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            response: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, vec![message.into()])
    }

    /// Generic 500; the cause is logged by the caller, never returned
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            vec![UNEXPECTED_ERROR_MESSAGE.to_string()],
        )
    }

    pub fn messages(&self) -> &[String] {
        self.response
            .as_ref()
            .map(|r| r.errors.body.as_slice())
            .unwrap_or_default()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.response {
            Some(response) => (self.status, Json(response)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, errors.messages())
            }
            DomainError::Conflict { message } => Self::unprocessable(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Forbidden { message } => Self::forbidden(message),
            DomainError::Credential { message } => {
                Self::new(StatusCode::UNAUTHORIZED, vec![message])
            }
            err @ (DomainError::Configuration { .. }
            | DomainError::Internal { .. }
            | DomainError::Storage { .. }) => {
                error!(error = %err, "Request failed unexpectedly");
                Self::internal()
            }
        }
    }
}

impl From<UnauthorizedError> for ApiError {
    fn from(err: UnauthorizedError) -> Self {
        if err.is_unexpected() {
            error!(error = %err, "Authorization failed unexpectedly");
            return Self::internal();
        }

        warn!(error = %err, "Unauthorized request");
        Self::unauthorized()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.messages().join(", "))
    }
}

impl std::error::Error for ApiError {}
