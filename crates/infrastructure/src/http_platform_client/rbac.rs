use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use evep_application::RbacGateway;
use evep_core::{AppResult, BearerToken};
use evep_domain::{PermissionRecord, RoleDraft, RoleRecord, UserRoleAssignment};

use super::{HttpPlatformClient, resource_path};

const ROLES_PATH: &str = "/api/v1/rbac/roles/";
const PERMISSIONS_PATH: &str = "/api/v1/rbac/permissions/";
const USER_ROLES_PATH: &str = "/api/v1/rbac/user-roles/";

#[derive(Debug, Serialize)]
struct RolePayload<'a> {
    name: &'a str,
    description: &'a str,
    permissions: &'a [String],
}

impl<'a> From<&'a RoleDraft> for RolePayload<'a> {
    fn from(draft: &'a RoleDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description().unwrap_or_default(),
            permissions: draft.permissions(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AssignUserRolePayload<'a> {
    user_id: &'a str,
    role_id: &'a str,
}

fn role_path(role_id: &str) -> AppResult<String> {
    resource_path(ROLES_PATH, role_id, true)
}

#[async_trait]
impl RbacGateway for HttpPlatformClient {
    async fn list_roles(&self, token: &BearerToken) -> AppResult<Vec<RoleRecord>> {
        self.get_json(token, ROLES_PATH, &[], "roles").await
    }

    async fn list_permissions(&self, token: &BearerToken) -> AppResult<Vec<PermissionRecord>> {
        self.get_json(token, PERMISSIONS_PATH, &[], "permissions")
            .await
    }

    async fn list_user_roles(&self, token: &BearerToken) -> AppResult<Vec<UserRoleAssignment>> {
        self.get_json(token, USER_ROLES_PATH, &[], "user_roles")
            .await
    }

    async fn create_role(&self, token: &BearerToken, draft: &RoleDraft) -> AppResult<RoleRecord> {
        self.send_json(
            Method::POST,
            token,
            ROLES_PATH,
            &RolePayload::from(draft),
            "role",
        )
        .await
    }

    async fn update_role(
        &self,
        token: &BearerToken,
        role_id: &str,
        draft: &RoleDraft,
    ) -> AppResult<RoleRecord> {
        self.send_json(
            Method::PUT,
            token,
            &role_path(role_id)?,
            &RolePayload::from(draft),
            "role",
        )
        .await
    }

    async fn delete_role(&self, token: &BearerToken, role_id: &str) -> AppResult<()> {
        self.delete(token, &role_path(role_id)?).await
    }

    async fn assign_user_role(
        &self,
        token: &BearerToken,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<UserRoleAssignment> {
        self.send_json(
            Method::PUT,
            token,
            USER_ROLES_PATH,
            &AssignUserRolePayload { user_id, role_id },
            "user_role",
        )
        .await
    }
}
