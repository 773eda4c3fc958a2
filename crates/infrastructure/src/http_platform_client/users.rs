use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use evep_application::{UserDirectoryGateway, UserPage};
use evep_core::{AppResult, BearerToken};
use evep_domain::{AdminUser, UserListQuery};

use super::{HttpPlatformClient, resource_path};

const USERS_PATH: &str = "/api/v1/user-management/";

/// The user list arrives either as a bare array or as a page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserListPayload {
    Page {
        users: Vec<AdminUser>,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<AdminUser>),
}

#[derive(Debug, Serialize)]
struct UserStatusPayload {
    is_active: bool,
}

fn user_path(user_id: &str) -> AppResult<String> {
    resource_path(USERS_PATH, user_id, false)
}

#[async_trait]
impl UserDirectoryGateway for HttpPlatformClient {
    async fn list_users(&self, token: &BearerToken, query: &UserListQuery) -> AppResult<UserPage> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }

        // The page object carries its own `users` key, so no envelope is peeled.
        let payload: UserListPayload = self.get_json(token, USERS_PATH, &params, "").await?;
        let (users, total) = match payload {
            UserListPayload::Page { users, total } => {
                let total = total.unwrap_or(users.len() as u64);
                (users, total)
            }
            UserListPayload::Bare(users) => {
                let total = users.len() as u64;
                (users, total)
            }
        };

        Ok(UserPage {
            users,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn find_user(&self, token: &BearerToken, user_id: &str) -> AppResult<AdminUser> {
        self.get_json(token, &user_path(user_id)?, &[], "user").await
    }

    async fn update_user_status(
        &self,
        token: &BearerToken,
        user_id: &str,
        is_active: bool,
    ) -> AppResult<AdminUser> {
        self.send_json(
            Method::PUT,
            token,
            &user_path(user_id)?,
            &UserStatusPayload { is_active },
            "user",
        )
        .await
    }
}
