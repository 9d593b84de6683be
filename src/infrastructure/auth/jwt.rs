//! Session token encoding and decoding (HS256 JWT)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

use crate::domain::user::{Email, UserId};
use crate::domain::Session;

/// Issuer stamped into every token and required on decode
pub const ISSUER: &str = "conduit";
/// Claim carrying the numeric user id
pub const USER_ID_CLAIM: &str = "userId";
/// Claim carrying the user's email at issue time
pub const EMAIL_CLAIM: &str = "email";

/// Underlying cause of an encode/decode failure
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token secret is not configured")]
    MissingSecret,

    #[error("token expiration of {hours} hours is out of range")]
    InvalidExpiration { hours: u64 },

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode session token: {0}")]
    FailedEncode(#[source] JwtError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode session token: {0}")]
    FailedDecode(#[source] JwtError),

    #[error("token issuer {actual:?} does not match")]
    NotMatchIssuer { actual: Option<String> },

    #[error("token is missing required claim '{claim}'")]
    NothingRequiredClaim { claim: &'static str },
}

/// Configuration for the session codec
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret; an empty secret makes every encode/decode fail
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: 24,
        }
    }
}

/// Turns a [`Session`] into a signed token and back
pub trait SessionCodec: Send + Sync + Debug {
    fn encode(&self, session: &Session) -> Result<String, EncodeError>;

    fn decode(&self, token: &str) -> Result<Session, DecodeError>;

    /// Token lifetime in hours
    fn expiration_hours(&self) -> u64;
}

#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    iss: &'a str,
    #[serde(rename = "userId")]
    user_id: i64,
    email: &'a str,
    iat: i64,
    exp: i64,
}

/// Claims as received; presence and types are checked after the signature
#[derive(Debug, Deserialize)]
struct ReceivedClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(rename = "userId", default)]
    user_id: Option<Value>,
    #[serde(default)]
    email: Option<Value>,
}

/// HS256 session codec using a shared secret
#[derive(Clone)]
pub struct JwtSessionCodec {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtSessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionCodec")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtSessionCodec {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn has_secret(&self) -> bool {
        !self.config.secret.is_empty()
    }
}

impl SessionCodec for JwtSessionCodec {
    fn encode(&self, session: &Session) -> Result<String, EncodeError> {
        if !self.has_secret() {
            return Err(EncodeError::FailedEncode(JwtError::MissingSecret));
        }

        let now = Utc::now();
        let hours = self.config.expiration_hours;
        let exp = i64::try_from(hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(EncodeError::FailedEncode(JwtError::InvalidExpiration { hours }))?;

        let claims = IssuedClaims {
            iss: ISSUER,
            user_id: session.user_id().value(),
            email: session.email().as_str(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| EncodeError::FailedEncode(e.into()))
    }

    fn decode(&self, token: &str) -> Result<Session, DecodeError> {
        if !self.has_secret() {
            return Err(DecodeError::FailedDecode(JwtError::MissingSecret));
        }

        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<ReceivedClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DecodeError::FailedDecode(e.into()))?
            .claims;

        if claims.iss.as_deref() != Some(ISSUER) {
            return Err(DecodeError::NotMatchIssuer {
                actual: claims.iss,
            });
        }

        let user_id = claims
            .user_id
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(DecodeError::NothingRequiredClaim {
                claim: USER_ID_CLAIM,
            })?;

        let email = claims
            .email
            .as_ref()
            .and_then(Value::as_str)
            .ok_or(DecodeError::NothingRequiredClaim { claim: EMAIL_CLAIM })?;

        // the email was validated when the token was issued
        Ok(Session::new(
            UserId::new(user_id),
            Email::new_without_validation(email),
        ))
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}
