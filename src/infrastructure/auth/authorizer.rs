//! Bearer token authorization
//!
//! Turns a raw `Authorization` header into a [`RegisteredUser`]:
//! parse the header, decode the token, load the user and check that the
//! email inside the token is still the user's current email.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::jwt::{DecodeError, SessionCodec};
use crate::domain::user::{Email, RegisteredUser, UserId, UserRepository};
use crate::domain::DomainError;

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerTokenParseError {
    #[error("authorization header has {found} components, expected 2")]
    WrongComponentCount { found: usize },

    #[error("authorization scheme '{scheme}' is not Bearer")]
    NotBearerScheme { scheme: String },
}

/// Why the user lookup failed in an unexpected way
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Storage(#[from] DomainError),

    #[error("user lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Reason a request could not be authorized
#[derive(Debug, Error)]
pub enum UnauthorizedError {
    #[error("authorization header is required")]
    RequiredBearerToken,

    #[error("failed to parse bearer token: {cause}")]
    FailedParseBearerToken {
        #[source]
        cause: BearerTokenParseError,
        authorization_header: String,
    },

    #[error("failed to decode token: {cause}")]
    FailedDecodeToken {
        #[source]
        cause: DecodeError,
        token: String,
    },

    #[error("user {user_id} not found")]
    NotFound { user_id: UserId },

    #[error("unexpected error while authorizing: {cause}")]
    Unexpected {
        #[source]
        cause: LookupError,
        authorization_header: String,
    },

    #[error("token email {old_email} does not match current email {new_email}")]
    NotMatchEmail { old_email: Email, new_email: Email },
}

impl UnauthorizedError {
    /// Failures caused by the server rather than the credential
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected { .. })
    }
}

/// An authorized user together with the token it presented
#[derive(Debug, Clone)]
pub struct Authorized {
    pub user: RegisteredUser,
    pub token: String,
}

/// Extract the token from a `Bearer <token>` header value
pub fn parse_bearer_token(header: &str) -> Result<&str, BearerTokenParseError> {
    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => Ok(token),
        [scheme, _] => Err(BearerTokenParseError::NotBearerScheme {
            scheme: (*scheme).to_string(),
        }),
        _ => Err(BearerTokenParseError::WrongComponentCount { found: parts.len() }),
    }
}

/// Authorization pipeline shared by the request extractors
#[derive(Clone)]
pub struct BearerAuthorizer {
    codec: Arc<dyn SessionCodec>,
    users: Arc<dyn UserRepository>,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for BearerAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuthorizer")
            .field("codec", &self.codec)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl BearerAuthorizer {
    pub fn new(
        codec: Arc<dyn SessionCodec>,
        users: Arc<dyn UserRepository>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            codec,
            users,
            lookup_timeout,
        }
    }

    pub async fn authorize(&self, header: Option<&str>) -> Result<Authorized, UnauthorizedError> {
        let header = header.ok_or(UnauthorizedError::RequiredBearerToken)?;

        let token = parse_bearer_token(header).map_err(|cause| {
            UnauthorizedError::FailedParseBearerToken {
                cause,
                authorization_header: header.to_string(),
            }
        })?;

        let session =
            self.codec
                .decode(token)
                .map_err(|cause| UnauthorizedError::FailedDecodeToken {
                    cause,
                    token: token.to_string(),
                })?;

        let user_id = session.user_id();
        let unexpected = |cause: LookupError| UnauthorizedError::Unexpected {
            cause,
            authorization_header: header.to_string(),
        };

        let user = tokio::time::timeout(self.lookup_timeout, self.users.find_by_user_id(user_id))
            .await
            .map_err(|_| unexpected(LookupError::TimedOut(self.lookup_timeout)))?
            .map_err(|e| unexpected(e.into()))?
            .ok_or(UnauthorizedError::NotFound { user_id })?;

        if user.email() != session.email() {
            return Err(UnauthorizedError::NotMatchEmail {
                old_email: session.email().clone(),
                new_email: user.email().clone(),
            });
        }

        debug!(user_id = %user_id, "Request authorized");

        Ok(Authorized {
            user,
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Bio, Image, MockUserRepository, Username};
    use crate::domain::Session;
    use crate::infrastructure::auth::{JwtConfig, JwtSessionCodec};

    fn codec() -> Arc<JwtSessionCodec> {
        Arc::new(JwtSessionCodec::new(JwtConfig::new("authorizer-secret", 1)))
    }

    fn user(email: &str) -> RegisteredUser {
        RegisteredUser::new(
            UserId::new(7),
            Email::new_without_validation(email),
            Username::new_without_validation("jake"),
            Bio::new_without_validation(""),
            Image::new_without_validation(""),
        )
    }

    fn token_for(codec: &JwtSessionCodec, email: &str) -> String {
        codec
            .encode(&Session::new(
                UserId::new(7),
                Email::new_without_validation(email),
            ))
            .unwrap()
    }

    fn authorizer(codec: Arc<JwtSessionCodec>, users: MockUserRepository) -> BearerAuthorizer {
        BearerAuthorizer::new(codec, Arc::new(users), Duration::from_millis(200))
    }

    #[test]
    fn test_parse_bearer_token() {
        assert_eq!(parse_bearer_token("Bearer abc.def"), Ok("abc.def"));
        assert_eq!(parse_bearer_token("bearer abc"), Ok("abc"));
        assert_eq!(
            parse_bearer_token("dummy-empty"),
            Err(BearerTokenParseError::WrongComponentCount { found: 1 })
        );
        assert_eq!(
            parse_bearer_token("Bearer a b"),
            Err(BearerTokenParseError::WrongComponentCount { found: 3 })
        );
        assert_eq!(
            parse_bearer_token("Token abc"),
            Err(BearerTokenParseError::NotBearerScheme {
                scheme: "Token".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_missing_header() {
        let result = authorizer(codec(), MockUserRepository::new())
            .authorize(None)
            .await;

        assert!(matches!(result, Err(UnauthorizedError::RequiredBearerToken)));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let result = authorizer(codec(), MockUserRepository::new())
            .authorize(Some("dummy-empty"))
            .await;

        match result {
            Err(UnauthorizedError::FailedParseBearerToken {
                authorization_header,
                ..
            }) => assert_eq!(authorization_header, "dummy-empty"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let result = authorizer(codec(), MockUserRepository::new())
            .authorize(Some("Bearer garbage"))
            .await;

        match result {
            Err(UnauthorizedError::FailedDecodeToken { token, .. }) => {
                assert_eq!(token, "garbage")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authorized() {
        let codec = codec();
        let token = token_for(&codec, "jake@jake.jake");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_user_id()
            .withf(|id| id.value() == 7)
            .times(1)
            .returning(|_| Ok(Some(user("jake@jake.jake"))));

        let header = format!("Bearer {}", token);
        let authorized = authorizer(codec, users)
            .authorize(Some(&header))
            .await
            .unwrap();

        assert_eq!(authorized.user.user_id(), UserId::new(7));
        assert_eq!(authorized.token, token);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let codec = codec();
        let header = format!("Bearer {}", token_for(&codec, "jake@jake.jake"));

        let mut users = MockUserRepository::new();
        users.expect_find_by_user_id().returning(|_| Ok(None));

        let result = authorizer(codec, users).authorize(Some(&header)).await;

        assert!(matches!(
            result,
            Err(UnauthorizedError::NotFound { user_id }) if user_id == UserId::new(7)
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure() {
        let codec = codec();
        let header = format!("Bearer {}", token_for(&codec, "jake@jake.jake"));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_user_id()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let error = authorizer(codec, users)
            .authorize(Some(&header))
            .await
            .unwrap_err();

        assert!(error.is_unexpected());
        assert!(matches!(
            error,
            UnauthorizedError::Unexpected {
                cause: LookupError::Storage(_),
                ..
            }
        ));
    }

    #[derive(Debug)]
    struct SlowUsers;

    #[async_trait::async_trait]
    impl UserRepository for SlowUsers {
        async fn find_by_user_id(
            &self,
            _user_id: UserId,
        ) -> Result<Option<RegisteredUser>, DomainError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn find_by_email_with_password(
            &self,
            _email: &Email,
        ) -> Result<Option<(RegisteredUser, String)>, DomainError> {
            unimplemented!()
        }

        async fn register(
            &self,
            _user: &crate::domain::UnregisteredUser,
            _password_hash: &str,
        ) -> Result<RegisteredUser, DomainError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _user_id: UserId,
            _update: &crate::domain::UserUpdate,
            _password_hash: Option<String>,
        ) -> Result<RegisteredUser, DomainError> {
            unimplemented!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_timeout() {
        let codec = codec();
        let header = format!("Bearer {}", token_for(&codec, "jake@jake.jake"));

        let authorizer =
            BearerAuthorizer::new(codec, Arc::new(SlowUsers), Duration::from_millis(50));
        let result = authorizer.authorize(Some(&header)).await;

        assert!(matches!(
            result,
            Err(UnauthorizedError::Unexpected {
                cause: LookupError::TimedOut(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_stale_email() {
        let codec = codec();
        let header = format!("Bearer {}", token_for(&codec, "old@jake.jake"));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_user_id()
            .returning(|_| Ok(Some(user("new@jake.jake"))));

        let result = authorizer(codec, users).authorize(Some(&header)).await;

        match result {
            Err(UnauthorizedError::NotMatchEmail {
                old_email,
                new_email,
            }) => {
                assert_eq!(old_email.as_str(), "old@jake.jake");
                assert_eq!(new_email.as_str(), "new@jake.jake");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
