//! Registration, login and token validation

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::access::Actor;
use crate::auth::password::PasswordHasher;
use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::auth::user::{NewUser, SafeUser, UserRole};
use crate::config::AdminBootstrap;
use crate::constants::{PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};
use crate::error::{FieldError, GatehouseError, Result};
use crate::security::AuthTimer;
use crate::services::validation::{
    is_valid_email, normalize_email, Credentials, LoginRequest, RegisterRequest,
};
use crate::storage::SharedUserStorage;

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SafeUser,
}

pub struct IdentityService {
    storage: SharedUserStorage,
    hasher: PasswordHasher,
    tokens: Arc<TokenManager>,
    login_min_duration: Duration,
}

impl IdentityService {
    pub fn new(storage: SharedUserStorage, hasher: PasswordHasher, tokens: Arc<TokenManager>) -> Self {
        Self {
            storage,
            hasher,
            tokens,
            login_min_duration: Duration::ZERO,
        }
    }

    /// Pad failed logins to at least `min_duration`
    pub fn with_login_min_duration(mut self, min_duration: Duration) -> Self {
        self.login_min_duration = min_duration;
        self
    }

    /// Register a new account. The role is always `USER` and no token is issued.
    pub async fn register(&self, request: RegisterRequest) -> Result<SafeUser> {
        let registration = request.validate(Utc::now())?;

        if self
            .storage
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            debug!("Registration rejected: email already registered");
            return Err(GatehouseError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(&registration.password).await?;

        // The store re-checks uniqueness atomically, so a concurrent duplicate still fails here
        let user = self
            .storage
            .create_user(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                middle_name: registration.middle_name,
                birth_date: registration.birth_date,
                email: registration.email,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!("Registered user {}", user.id);
        Ok(user.to_safe_view())
    }

    /// Log in with email and password
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let credentials = request.validate()?;

        let timer = AuthTimer::new(self.login_min_duration);
        let result = self.check_credentials(credentials).await;
        if let Err(ref e) = result {
            warn!("Login failed: {}", e);
            timer.wait().await;
        }
        result
    }

    async fn check_credentials(&self, credentials: Credentials) -> Result<LoginResponse> {
        // Unknown email and wrong password are reported identically
        let user = self
            .storage
            .find_by_email(&credentials.email)
            .await?
            .ok_or(GatehouseError::InvalidCredentials)?;

        if !user.is_active {
            return Err(GatehouseError::AccountBlocked);
        }

        if !self
            .hasher
            .verify(&credentials.password, user.password_hash())
            .await?
        {
            return Err(GatehouseError::InvalidCredentials);
        }

        let actor = Actor::new(user.id, user.email.clone(), user.role);
        let token = self.tokens.issue(&actor)?;

        info!("User {} logged in", user.id);
        Ok(LoginResponse {
            token,
            user: user.to_safe_view(),
        })
    }

    /// Validate a bare token and return the actor it speaks for
    pub fn validate_token(&self, token: &str) -> Result<Actor> {
        self.tokens.validate_actor(token)
    }

    /// Authentication gate: turn a raw `Authorization` header into an actor
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Actor> {
        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(GatehouseError::Unauthenticated)?;
        self.validate_token(token)
    }

    /// Create the bootstrap administrator unless its email is already taken.
    ///
    /// Returns the created account, or `None` if it already existed.
    pub async fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<Option<SafeUser>> {
        let email = normalize_email(&admin.email);
        let mut errors = Vec::new();
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Invalid email"));
        }
        let password_len = admin.password.chars().count();
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password_len) {
            errors.push(FieldError::new(
                "password",
                format!(
                    "Password must be between {} and {} characters",
                    PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
                ),
            ));
        }
        if !errors.is_empty() {
            return Err(GatehouseError::Validation(errors));
        }

        if let Some(existing) = self.storage.find_by_email(&email).await? {
            if existing.role != UserRole::Admin {
                warn!(
                    "Bootstrap admin email belongs to non-admin user {}; leaving it unchanged",
                    existing.id
                );
            }
            return Ok(None);
        }

        let password_hash = self.hasher.hash(&admin.password).await?;
        let birth_date = NaiveDate::from_ymd_opt(1980, 1, 1)
            .ok_or_else(|| GatehouseError::Internal("Invalid bootstrap birth date".to_string()))?;

        let user = match self
            .storage
            .create_user(NewUser {
                first_name: "Admin".to_string(),
                last_name: "Admin".to_string(),
                middle_name: None,
                birth_date,
                email,
                password_hash,
                role: UserRole::Admin,
            })
            .await
        {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same email
            Err(GatehouseError::AlreadyExists) => return Ok(None),
            Err(e) => return Err(e),
        };

        info!("Created bootstrap admin {}", user.id);
        Ok(Some(user.to_safe_view()))
    }
}
