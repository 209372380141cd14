//! Server configuration module
//! Handles configuration parameters for the HTTP service, loaded from the environment

use crate::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_HOST,
    DEFAULT_LOGIN_MIN_DURATION_MS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, DEFAULT_TOKEN_TTL_HOURS,
    MAX_TOKEN_TTL_HOURS,
};
use crate::error::{GatehouseError, Result};
use std::env;
use std::time::Duration;

/// Credentials for the administrator account created at startup
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    pub argon2_iterations: u32,
    /// Failed logins take at least this long
    pub login_min_duration: Duration,
    /// Maximum accepted request body size
    pub max_body_bytes: u64,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
    pub admin: Option<AdminBootstrap>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

/// Unset or blank variables take the default; anything else must parse
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            GatehouseError::ConfigError(format!("{} has an invalid value: '{}'", name, raw))
        }),
        _ => Ok(default),
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            jwt_secret: "test-jwt-key-only-for-unit-tests-never-use-in-production-0".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            login_min_duration: Duration::ZERO,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_origins: Vec::new(),
            admin: None,
        }
    }

    /// Validate that the JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(GatehouseError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(GatehouseError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GatehouseError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("GATEHOUSE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = parse_var("GATEHOUSE_PORT", DEFAULT_PORT)?;

        let jwt_secret = env::var("GATEHOUSE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                GatehouseError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let token_ttl_hours = parse_var("GATEHOUSE_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(GatehouseError::ConfigError(format!(
                "GATEHOUSE_TOKEN_TTL_HOURS must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        let argon2_memory_kib =
            parse_var("GATEHOUSE_ARGON2_MEMORY_KIB", DEFAULT_ARGON2_MEMORY_KIB)?;
        let argon2_iterations =
            parse_var("GATEHOUSE_ARGON2_ITERATIONS", DEFAULT_ARGON2_ITERATIONS)?;

        let login_min_duration = Duration::from_millis(parse_var(
            "GATEHOUSE_LOGIN_MIN_DURATION_MS",
            DEFAULT_LOGIN_MIN_DURATION_MS,
        )?);

        let max_body_bytes = parse_var("GATEHOUSE_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;

        let allowed_origins = env::var("GATEHOUSE_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let admin = match (
            env::var("GATEHOUSE_ADMIN_EMAIL").ok(),
            env::var("GATEHOUSE_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => {
                return Err(GatehouseError::ConfigError(
                    "GATEHOUSE_ADMIN_EMAIL and GATEHOUSE_ADMIN_PASSWORD must be set together"
                        .to_string(),
                ))
            }
        };

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_hours,
            argon2_memory_kib,
            argon2_iterations,
            login_min_duration,
            max_body_bytes,
            allowed_origins,
            admin,
        })
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}
