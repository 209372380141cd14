//! In-memory storage implementation for development and testing
//!
//! Keeps all user records in memory behind a single lock. Suitable for
//! development, testing, or small deployments.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::UserStorage;
use crate::auth::user::{NewUser, User};
use crate::error::{GatehouseError, Result};

#[derive(Default)]
struct UserTable {
    users: HashMap<u64, User>,
    by_email: HashMap<String, u64>, // email -> user_id
    next_id: u64,
}

/// In-memory user storage
pub struct MemoryUserStorage {
    table: Arc<RwLock<UserTable>>,
}

impl MemoryUserStorage {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(UserTable {
                next_id: 1,
                ..UserTable::default()
            })),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.table.read().await.users.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryUserStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut table = self.table.write().await;

        // Checked under the same write lock as the insert
        if table.by_email.contains_key(&user.email) {
            return Err(GatehouseError::AlreadyExists);
        }

        let id = table.next_id;
        table.next_id += 1;

        let record = User::from_new(id, user, Utc::now());
        table.by_email.insert(record.email.clone(), id);
        table.users.insert(id, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, user_id: u64) -> Result<Option<User>> {
        Ok(self.table.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn update_status(&self, user_id: u64, is_active: bool) -> Result<User> {
        let mut table = self.table.write().await;

        match table.users.get_mut(&user_id) {
            Some(user) => {
                user.set_active(is_active);
                Ok(user.clone())
            }
            None => Err(GatehouseError::NotFound),
        }
    }

    async fn list_page(&self, skip: usize, take: usize) -> Result<Vec<User>> {
        let table = self.table.read().await;

        let mut sorted: Vec<&User> = table.users.values().collect();
        // Newest first; ids break ties between records created in the same instant
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(sorted.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn delete_user(&self, user_id: u64) -> Result<()> {
        let mut table = self.table.write().await;

        if let Some(user) = table.users.remove(&user_id) {
            table.by_email.remove(&user.email);
            Ok(())
        } else {
            Err(GatehouseError::NotFound)
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
