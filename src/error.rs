use serde::Serialize;
use std::error::Error;
use std::fmt;
use warp::http::StatusCode;

use crate::auth::access::DenyReason;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum GatehouseError {
    // Input errors
    Validation(Vec<FieldError>),
    MalformedInput(String),

    // Credential errors
    AlreadyExists,
    InvalidCredentials,
    AccountBlocked,

    // Auth gate errors
    Unauthenticated,
    InvalidToken,

    // Authorization errors
    Forbidden(DenyReason),

    // Lookup errors
    NotFound,

    // Storage errors
    StorageError(String),

    // System errors
    Internal(String),

    // Configuration errors
    ConfigError(String),
}

impl GatehouseError {
    /// HTTP status for this error. This is the only place errors are mapped to statuses.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::AccountBlocked
            | Self::Unauthenticated
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StorageError(_) | Self::Internal(_) | Self::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to a client. Internal detail never leaves the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::StorageError(_) | Self::Internal(_) | Self::ConfigError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Field errors, if this is a validation failure
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for GatehouseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Validation error: {}", joined)
            }
            Self::MalformedInput(msg) => write!(f, "{}", msg),
            Self::AlreadyExists => write!(f, "User with this email already exists"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::AccountBlocked => write!(f, "User is blocked"),
            Self::Unauthenticated => write!(f, "Authorization required"),
            Self::InvalidToken => write!(f, "Invalid token"),
            Self::Forbidden(reason) => write!(f, "{}", reason),
            Self::NotFound => write!(f, "User not found"),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for GatehouseError {}

// Lets the warp routes carry a service error through a rejection into the recover handler
impl warp::reject::Reject for GatehouseError {}

impl From<tokio::task::JoinError> for GatehouseError {
    fn from(err: tokio::task::JoinError) -> Self {
        GatehouseError::Internal(format!("Blocking task failed: {}", err))
    }
}

// Generic result type for Gatehouse
pub type Result<T> = std::result::Result<T, GatehouseError>;
