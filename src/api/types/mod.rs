//! Shared API types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, UNEXPECTED_ERROR_MESSAGE};
pub use json::Json;
