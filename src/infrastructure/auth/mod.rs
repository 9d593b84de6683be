//! Authentication infrastructure module
//!
//! This module provides the session token codec and the bearer token
//! authorization pipeline.

mod authorizer;
mod jwt;

pub use authorizer::{
    parse_bearer_token, Authorized, BearerAuthorizer, BearerTokenParseError, LookupError,
    UnauthorizedError,
};
pub use jwt::{
    DecodeError, EncodeError, JwtConfig, JwtError, JwtSessionCodec, SessionCodec, EMAIL_CLAIM,
    ISSUER, USER_ID_CLAIM,
};
