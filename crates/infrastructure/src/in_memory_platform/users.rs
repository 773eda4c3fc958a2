use async_trait::async_trait;

use evep_application::{UserDirectoryGateway, UserPage};
use evep_core::{AppError, AppResult, BearerToken};
use evep_domain::{AdminUser, UserListQuery};

use super::InMemoryPlatform;

#[async_trait]
impl UserDirectoryGateway for InMemoryPlatform {
    async fn list_users(&self, _token: &BearerToken, query: &UserListQuery) -> AppResult<UserPage> {
        let users = self.users.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&AdminUser> = users
            .iter()
            .filter(|user| {
                needle.as_deref().is_none_or(|needle| {
                    user.name.to_lowercase().contains(needle)
                        || user.email.to_lowercase().contains(needle)
                })
            })
            .collect();

        let offset = (query.page.saturating_sub(1) as usize).saturating_mul(query.limit as usize);
        Ok(UserPage {
            total: matching.len() as u64,
            users: matching
                .into_iter()
                .skip(offset)
                .take(query.limit as usize)
                .cloned()
                .collect(),
            page: query.page,
            limit: query.limit,
        })
    }

    async fn find_user(&self, _token: &BearerToken, user_id: &str) -> AppResult<AdminUser> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }

    async fn update_user_status(
        &self,
        _token: &BearerToken,
        user_id: &str,
        is_active: bool,
    ) -> AppResult<AdminUser> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;
        user.is_active = is_active;

        Ok(user.clone())
    }
}
