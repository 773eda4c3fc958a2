use std::sync::Arc;

use tracing::info;

use evep_core::AppResult;
use evep_domain::{AdminUser, UserListQuery};

use crate::{
    ConsoleSession, QueryCache, QueryKey, UserDirectoryGateway, UserPage, require_menu_access,
};

const USERS_PATH: &str = "/users";

/// Application service for the user management table.
#[derive(Clone)]
pub struct UserAdminService {
    gateway: Arc<dyn UserDirectoryGateway>,
    cache: Arc<QueryCache>,
}

impl UserAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(gateway: Arc<dyn UserDirectoryGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Lists one page of users.
    pub async fn list_users(
        &self,
        session: &ConsoleSession,
        query: &UserListQuery,
    ) -> AppResult<UserPage> {
        require_menu_access(session, USERS_PATH)?;

        let params = format!(
            "page={}&limit={}&search={}",
            query.page,
            query.limit,
            query.search.as_deref().unwrap_or_default()
        );
        self.cache
            .get_or_fetch(&session.cache_scope(), QueryKey::Users, &params, || {
                self.gateway.list_users(session.token(), query)
            })
            .await
    }

    /// Flips a user's activation flag.
    ///
    /// The current record is read fresh so the flip never acts on a stale
    /// cached row.
    pub async fn toggle_active(
        &self,
        session: &ConsoleSession,
        user_id: &str,
    ) -> AppResult<AdminUser> {
        require_menu_access(session, USERS_PATH)?;

        let current = self.gateway.find_user(session.token(), user_id).await?;
        let next_status = current.status().toggled();
        let updated = self
            .gateway
            .update_user_status(session.token(), user_id, next_status.is_active())
            .await?;

        info!(
            user_id,
            status = updated.status().as_str(),
            "user activation changed"
        );
        self.cache
            .invalidate(&[QueryKey::Users, QueryKey::DashboardStats])
            .await;

        Ok(updated)
    }
}
