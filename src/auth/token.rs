use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::access::Actor;
use crate::auth::user::UserRole;
use crate::constants::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_LENGTH};
use crate::error::{GatehouseError, Result};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub email: String,
    pub role: UserRole,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an actor, expiring `lifetime` from now
    pub fn for_actor(actor: &Actor, lifetime: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id: actor.id,
            email: actor.email.clone(),
            role: actor.role,
            iat: now,
            exp: now + lifetime.num_seconds(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.email.clone(), self.role)
    }
}

/// Issues and validates HS256 bearer tokens
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and the default 24 hour lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_lifetime(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn with_lifetime(secret: &str, lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signs a token carrying the actor's identity
    pub fn issue(&self, actor: &Actor) -> Result<String> {
        let claims = Claims::for_actor(actor, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatehouseError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validates and decodes a token.
    ///
    /// Bad signatures, expired tokens and garbage all fail the same way.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        if token.is_empty() || token.len() > MAX_TOKEN_LENGTH {
            return Err(GatehouseError::InvalidToken);
        }
        if token.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(GatehouseError::InvalidToken);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                log::debug!("Token validation failed: {}", e);
                GatehouseError::InvalidToken
            })?;

        if token_data.claims.is_expired() {
            return Err(GatehouseError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// Validates a token and returns the actor it speaks for
    pub fn validate_actor(&self, token: &str) -> Result<Actor> {
        self.validate(token).map(|claims| claims.actor())
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
