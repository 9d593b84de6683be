//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::article::ArticleService;
use crate::infrastructure::auth::{BearerAuthorizer, SessionCodec};
use crate::infrastructure::comment::CommentService;
use crate::infrastructure::profile::ProfileService;
use crate::infrastructure::storage::Repositories;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub profile_service: Arc<ProfileService>,
    pub article_service: Arc<ArticleService>,
    pub comment_service: Arc<CommentService>,
    pub authorizer: Arc<BearerAuthorizer>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        codec: Arc<dyn SessionCodec>,
        hasher: Arc<dyn PasswordHasher>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(
                repositories.users.clone(),
                hasher,
                codec.clone(),
            )),
            profile_service: Arc::new(ProfileService::new(repositories.profiles)),
            article_service: Arc::new(ArticleService::new(repositories.articles)),
            comment_service: Arc::new(CommentService::new(repositories.comments)),
            authorizer: Arc::new(BearerAuthorizer::new(
                codec,
                repositories.users,
                lookup_timeout,
            )),
        }
    }
}
