//! Abstract storage interface for pluggable backends
//!
//! The credential store is the only shared mutable state in the service.
//! Implementations own their consistency guarantees, email uniqueness under
//! concurrent registration included.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::user::{NewUser, User};
use crate::error::Result;

/// User record storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Persist a new user, assigning id and timestamps.
    ///
    /// Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get user by ID
    async fn find_by_id(&self, user_id: u64) -> Result<Option<User>>;

    /// Get user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Set the active flag. Fails with `NotFound` if the user does not exist.
    async fn update_status(&self, user_id: u64, is_active: bool) -> Result<User>;

    /// A page of users ordered by creation time, newest first
    async fn list_page(&self, skip: usize, take: usize) -> Result<Vec<User>>;

    /// Delete a user
    async fn delete_user(&self, user_id: u64) -> Result<()>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<bool>;
}

pub type SharedUserStorage = Arc<dyn UserStorage>;
