//! Service wiring: the store, hasher and token manager are built once and
//! handed to the identity and user services

use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenManager;
use crate::config::ServerConfig;
use crate::constants::DEFAULT_MAX_BODY_BYTES;
use crate::error::Result;
use crate::services::{IdentityService, UserService};
use crate::storage::SharedUserStorage;

/// Everything the HTTP routes need, cheap to clone into each filter
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub users: Arc<UserService>,
    pub storage: SharedUserStorage,
    pub max_body_bytes: u64,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(identity: IdentityService, users: UserService, storage: SharedUserStorage) -> Self {
        Self {
            identity: Arc::new(identity),
            users: Arc::new(users),
            storage,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_origins: Vec::new(),
        }
    }

    /// Build all services from configuration on top of `storage`
    pub fn from_config(config: &ServerConfig, storage: SharedUserStorage) -> Result<Self> {
        let hasher = PasswordHasher::with_cost(config.argon2_memory_kib, config.argon2_iterations)?;
        let tokens = Arc::new(TokenManager::with_lifetime(
            &config.jwt_secret,
            config.token_lifetime(),
        ));

        let identity = IdentityService::new(storage.clone(), hasher, tokens)
            .with_login_min_duration(config.login_min_duration);
        let users = UserService::new(storage.clone());

        let mut state = Self::new(identity, users, storage);
        state.max_body_bytes = config.max_body_bytes;
        state.allowed_origins = config.allowed_origins.clone();
        Ok(state)
    }
}
