use async_trait::async_trait;

use evep_core::{AppResult, BearerToken};
use evep_domain::{PermissionRecord, RoleDraft, RoleRecord, UserRoleAssignment};

/// Port for the platform's role, permission and assignment endpoints.
#[async_trait]
pub trait RbacGateway: Send + Sync {
    /// Lists all roles with their permission ids.
    async fn list_roles(&self, token: &BearerToken) -> AppResult<Vec<RoleRecord>>;

    /// Lists permissions known to the platform.
    async fn list_permissions(&self, token: &BearerToken) -> AppResult<Vec<PermissionRecord>>;

    /// Lists user-to-role assignments.
    async fn list_user_roles(&self, token: &BearerToken) -> AppResult<Vec<UserRoleAssignment>>;

    /// Creates a role.
    async fn create_role(&self, token: &BearerToken, draft: &RoleDraft) -> AppResult<RoleRecord>;

    /// Replaces name, description and permissions of a role.
    async fn update_role(
        &self,
        token: &BearerToken,
        role_id: &str,
        draft: &RoleDraft,
    ) -> AppResult<RoleRecord>;

    /// Deletes a role.
    async fn delete_role(&self, token: &BearerToken, role_id: &str) -> AppResult<()>;

    /// Makes `role_id` the active role of `user_id`.
    async fn assign_user_role(
        &self,
        token: &BearerToken,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<UserRoleAssignment>;
}
