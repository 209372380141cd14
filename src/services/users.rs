//! Role-gated user lookup, listing and status changes

use log::{debug, info, warn};
use serde::Serialize;

use crate::auth::access::{can_change_status, can_list_users, can_view_user, Actor};
use crate::auth::user::SafeUser;
use crate::constants::MAX_PAGE_SIZE;
use crate::error::{GatehouseError, Result};
use crate::storage::SharedUserStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub skip: usize,
    /// The page size actually applied, after clamping
    pub take: usize,
    /// Number of users in this page
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<SafeUser>,
    pub pagination: Pagination,
}

pub struct UserService {
    storage: SharedUserStorage,
}

impl UserService {
    pub fn new(storage: SharedUserStorage) -> Self {
        Self { storage }
    }

    pub async fn get_user_by_id(&self, target_id: u64, actor: &Actor) -> Result<SafeUser> {
        let target = self
            .storage
            .find_by_id(target_id)
            .await?
            .ok_or(GatehouseError::NotFound)?;

        if let Err(e) = can_view_user(actor, &target).into_result() {
            warn!("User {} denied view of user {}: {}", actor.id, target_id, e);
            return Err(e);
        }

        debug!("User {} viewed user {}", actor.id, target_id);
        Ok(target.to_safe_view())
    }

    /// One page of users, newest first. `take` is clamped to the maximum page size.
    pub async fn get_all_users(&self, actor: &Actor, skip: usize, take: usize) -> Result<UserPage> {
        if let Err(e) = can_list_users(actor).into_result() {
            warn!("User {} denied user listing", actor.id);
            return Err(e);
        }

        let take = take.min(MAX_PAGE_SIZE);
        let users: Vec<SafeUser> = self
            .storage
            .list_page(skip, take)
            .await?
            .iter()
            .map(SafeUser::from)
            .collect();

        let pagination = Pagination {
            skip,
            take,
            total: users.len(),
        };
        Ok(UserPage { users, pagination })
    }

    /// Permission is decided from the requested id before the store is touched
    pub async fn update_user_status(
        &self,
        target_id: u64,
        is_active: bool,
        actor: &Actor,
    ) -> Result<SafeUser> {
        if let Err(e) = can_change_status(actor, target_id, is_active).into_result() {
            warn!(
                "User {} denied status change of user {}: {}",
                actor.id, target_id, e
            );
            return Err(e);
        }

        let user = self.storage.update_status(target_id, is_active).await?;

        info!(
            "User {} set user {} active={}",
            actor.id, target_id, is_active
        );
        Ok(user.to_safe_view())
    }
}
