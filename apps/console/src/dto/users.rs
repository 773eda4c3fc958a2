use evep_application::UserPage;
use evep_domain::AdminUser;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the user table.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// API representation of a user row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
    /// `active` or `inactive`.
    pub status: String,
    pub is_active: bool,
    pub last_login: Option<String>,
}

impl From<AdminUser> for UserResponse {
    fn from(value: AdminUser) -> Self {
        Self {
            status: value.status().as_str().to_owned(),
            id: value.id,
            email: value.email,
            name: value.name,
            role: value.role,
            department: value.department,
            is_active: value.is_active,
            last_login: value.last_login,
        }
    }
}

/// One page of the user table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/user-page-response.ts"
)]
pub struct UserPageResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<UserPage> for UserPageResponse {
    fn from(value: UserPage) -> Self {
        Self {
            users: value.users.into_iter().map(UserResponse::from).collect(),
            total: value.total,
            page: value.page,
            limit: value.limit,
        }
    }
}

/// Result of an activation toggle.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/toggle-user-response.ts"
)]
pub struct ToggleUserResponse {
    pub message: String,
    pub user: UserResponse,
}
