//! Orchestration of the credential store, password hasher, token manager
//! and access control decisions

pub mod identity;
pub mod users;
pub mod validation;

pub use identity::{IdentityService, LoginResponse};
pub use users::{Pagination, UserPage, UserService};
pub use validation::{Credentials, LoginRequest, RegisterRequest, Registration};
