use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use evep_core::{AppResult, BearerToken};
use evep_domain::{AdminUser, UserListQuery};

/// One page of the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    /// Users on this page.
    pub users: Vec<AdminUser>,
    /// Total users matching the query.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

/// Port for the user-management endpoints.
#[async_trait]
pub trait UserDirectoryGateway: Send + Sync {
    /// Lists one page of users.
    async fn list_users(&self, token: &BearerToken, query: &UserListQuery) -> AppResult<UserPage>;

    /// Reads one user.
    async fn find_user(&self, token: &BearerToken, user_id: &str) -> AppResult<AdminUser>;

    /// Sets the activation flag and returns the stored user.
    async fn update_user_status(
        &self,
        token: &BearerToken,
        user_id: &str,
        is_active: bool,
    ) -> AppResult<AdminUser>;
}
