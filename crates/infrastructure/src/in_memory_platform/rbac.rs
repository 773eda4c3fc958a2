use async_trait::async_trait;
use uuid::Uuid;

use evep_application::RbacGateway;
use evep_core::{AppError, AppResult, BearerToken};
use evep_domain::{PermissionRecord, RoleDraft, RoleRecord, UserRoleAssignment};

use super::{InMemoryPlatform, now_rfc3339};

fn ensure_unique_name(roles: &[RoleRecord], name: &str, except_id: Option<&str>) -> AppResult<()> {
    let taken = roles.iter().any(|role| {
        role.name.eq_ignore_ascii_case(name) && Some(role.id.as_str()) != except_id
    });

    if taken {
        return Err(AppError::Conflict(format!("role '{name}' already exists")));
    }

    Ok(())
}

#[async_trait]
impl RbacGateway for InMemoryPlatform {
    async fn list_roles(&self, _token: &BearerToken) -> AppResult<Vec<RoleRecord>> {
        Ok(self.roles.read().await.clone())
    }

    async fn list_permissions(&self, _token: &BearerToken) -> AppResult<Vec<PermissionRecord>> {
        Ok(self.permissions.read().await.clone())
    }

    async fn list_user_roles(&self, _token: &BearerToken) -> AppResult<Vec<UserRoleAssignment>> {
        Ok(self.user_roles.read().await.clone())
    }

    async fn create_role(&self, _token: &BearerToken, draft: &RoleDraft) -> AppResult<RoleRecord> {
        let mut roles = self.roles.write().await;
        ensure_unique_name(&roles, draft.name(), None)?;

        let role = RoleRecord {
            id: Uuid::new_v4().to_string(),
            name: draft.name().to_owned(),
            description: draft.description().unwrap_or_default().to_owned(),
            permissions: draft.permissions().to_vec(),
            is_system: false,
        };
        roles.push(role.clone());

        Ok(role)
    }

    async fn update_role(
        &self,
        _token: &BearerToken,
        role_id: &str,
        draft: &RoleDraft,
    ) -> AppResult<RoleRecord> {
        let mut roles = self.roles.write().await;
        ensure_unique_name(&roles, draft.name(), Some(role_id))?;

        let role = roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' not found")))?;
        role.name = draft.name().to_owned();
        role.description = draft.description().unwrap_or_default().to_owned();
        role.permissions = draft.permissions().to_vec();

        Ok(role.clone())
    }

    async fn delete_role(&self, _token: &BearerToken, role_id: &str) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let before = roles.len();
        roles.retain(|role| role.id != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' not found")));
        }
        drop(roles);

        self.user_roles
            .write()
            .await
            .retain(|assignment| assignment.role_id != role_id);
        Ok(())
    }

    async fn assign_user_role(
        &self,
        _token: &BearerToken,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<UserRoleAssignment> {
        if !self.roles.read().await.iter().any(|role| role.id == role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' not found")));
        }

        {
            let mut users = self.users.write().await;
            let user = users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;
            user.role = role_id.to_owned();
        }

        let assignment = UserRoleAssignment {
            user_id: user_id.to_owned(),
            role_id: role_id.to_owned(),
            assigned_at: Some(now_rfc3339()),
        };
        let mut user_roles = self.user_roles.write().await;
        user_roles.retain(|existing| existing.user_id != user_id);
        user_roles.push(assignment.clone());

        Ok(assignment)
    }
}
