//! Conduit API
//!
//! A RealWorld blogging backend:
//! - Users with Argon2-hashed passwords and JWT sessions
//! - Profiles and the follow relation
//! - Articles, favorites, tags and comments
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use infrastructure::auth::{JwtConfig, JwtSessionCodec, SessionCodec};
use infrastructure::storage::StorageFactory;
use infrastructure::user::Argon2Hasher;

const GENERATED_SECRET_LENGTH: usize = 64;

/// Build the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = config.storage.storage_config();
    info!("Storage backend: {:?}", storage.storage_type());

    let repositories = StorageFactory::create(&storage).await?;

    Ok(AppState::new(
        repositories,
        create_session_codec(config),
        Arc::new(Argon2Hasher::new()),
        config.auth.lookup_timeout(),
    ))
}

/// Create the session codec, generating a secret when none is configured
fn create_session_codec(config: &AppConfig) -> Arc<dyn SessionCodec> {
    let mut jwt = config.auth.jwt();

    if jwt.secret.is_empty() {
        warn!(
            "No auth.jwt_secret configured. Generating random secret. \
             Tokens will not survive a restart."
        );
        jwt = JwtConfig::new(generate_random_secret(), jwt.expiration_hours);
    }

    Arc::new(JwtSessionCodec::new(jwt))
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LENGTH)
        .map(char::from)
        .collect()
}
