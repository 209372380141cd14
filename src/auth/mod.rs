//! Authentication and authorization module

pub mod access;
pub mod password;
pub mod token;
pub mod user;

// Re-export main components
pub use access::{Actor, Decision, DenyReason};
pub use password::PasswordHasher;
pub use token::{Claims, TokenManager};
pub use user::{NewUser, SafeUser, User, UserRole};
