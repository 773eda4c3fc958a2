use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use evep_core::{AppError, AppResult};
use evep_domain::{
    PermissionRecord, RoleForm, RoleRecord, UserRoleAssignment, builtin_permission_catalog,
    group_permissions_by_category, merge_permission_catalog,
};

use crate::{ConsoleSession, QueryCache, QueryKey, RbacGateway, require_menu_access};

const RBAC_PATH: &str = "/rbac";

/// Everything the roles & permissions page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RbacSnapshot {
    /// Platform roles.
    pub roles: Vec<RoleRecord>,
    /// Builtin catalog merged with server permissions.
    pub permissions: Vec<PermissionRecord>,
    /// Current user-to-role assignments.
    pub user_roles: Vec<UserRoleAssignment>,
}

impl RbacSnapshot {
    /// Returns the merged catalog grouped for the permission picker.
    #[must_use]
    pub fn permission_groups(&self) -> BTreeMap<String, Vec<PermissionRecord>> {
        group_permissions_by_category(&self.permissions)
    }

    /// Returns role ids mapped to granted permission ids missing from the catalog.
    #[must_use]
    pub fn unknown_permissions(&self) -> BTreeMap<String, Vec<String>> {
        self.roles
            .iter()
            .filter_map(|role| {
                let unknown = role.unknown_permission_ids(&self.permissions);
                (!unknown.is_empty()).then(|| (role.id.clone(), unknown))
            })
            .collect()
    }

    fn find_role(&self, role_id: &str) -> AppResult<&RoleRecord> {
        self.roles
            .iter()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}

/// Result of a successful RBAC mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RbacMutationOutcome<T> {
    /// User-facing success message.
    pub message: &'static str,
    /// Record returned by the platform.
    pub value: T,
    /// Snapshot refetched after invalidation, or `None` when the refetch
    /// failed after the mutation had already been applied.
    pub snapshot: Option<RbacSnapshot>,
}

/// Application service for role, permission and assignment administration.
#[derive(Clone)]
pub struct RbacAdminService {
    gateway: Arc<dyn RbacGateway>,
    cache: Arc<QueryCache>,
}

impl RbacAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(gateway: Arc<dyn RbacGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Loads roles, permissions and assignments concurrently.
    ///
    /// The snapshot is built only after all three reads settle; the first
    /// failure is returned.
    pub async fn load_snapshot(&self, session: &ConsoleSession) -> AppResult<RbacSnapshot> {
        require_menu_access(session, RBAC_PATH)?;

        let scope = session.cache_scope();
        let token = session.token();
        let (roles, server_permissions, user_roles) = tokio::join!(
            self.cache.get_or_fetch(&scope, QueryKey::Roles, "", || {
                self.gateway.list_roles(token)
            }),
            self.cache.get_or_fetch(&scope, QueryKey::Permissions, "", || {
                self.gateway.list_permissions(token)
            }),
            self.cache.get_or_fetch(&scope, QueryKey::UserRoles, "", || {
                self.gateway.list_user_roles(token)
            }),
        );

        let server_permissions: Vec<PermissionRecord> = server_permissions?;
        Ok(RbacSnapshot {
            roles: roles?,
            permissions: merge_permission_catalog(
                &builtin_permission_catalog(),
                &server_permissions,
            ),
            user_roles: user_roles?,
        })
    }

    /// Creates a role from the dialog form.
    pub async fn create_role(
        &self,
        session: &ConsoleSession,
        form: RoleForm,
    ) -> AppResult<RbacMutationOutcome<RoleRecord>> {
        require_menu_access(session, RBAC_PATH)?;
        let draft = form.into_draft()?;

        let role = self.gateway.create_role(session.token(), &draft).await?;
        info!(role_id = %role.id, name = %role.name, "role created");

        self.finish(session, "Role created successfully!", role, &[QueryKey::Roles])
            .await
    }

    /// Replaces an existing role's fields.
    pub async fn update_role(
        &self,
        session: &ConsoleSession,
        role_id: &str,
        form: RoleForm,
    ) -> AppResult<RbacMutationOutcome<RoleRecord>> {
        require_menu_access(session, RBAC_PATH)?;
        let draft = form.into_draft()?;
        self.ensure_role_mutable(session, role_id).await?;

        let role = self
            .gateway
            .update_role(session.token(), role_id, &draft)
            .await?;
        info!(role_id = %role.id, "role updated");

        self.finish(session, "Role updated successfully!", role, &[QueryKey::Roles])
            .await
    }

    /// Deletes a role.
    pub async fn delete_role(
        &self,
        session: &ConsoleSession,
        role_id: &str,
    ) -> AppResult<RbacMutationOutcome<()>> {
        require_menu_access(session, RBAC_PATH)?;
        self.ensure_role_mutable(session, role_id).await?;

        self.gateway.delete_role(session.token(), role_id).await?;
        info!(role_id, "role deleted");

        self.finish(
            session,
            "Role deleted successfully!",
            (),
            &[QueryKey::Roles, QueryKey::UserRoles],
        )
        .await
    }

    /// Makes a role the active role of a user.
    pub async fn assign_user_role(
        &self,
        session: &ConsoleSession,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<RbacMutationOutcome<UserRoleAssignment>> {
        require_menu_access(session, RBAC_PATH)?;
        if user_id.trim().is_empty() || role_id.trim().is_empty() {
            return Err(AppError::Validation(
                "select both a user and a role".to_owned(),
            ));
        }

        let assignment = self
            .gateway
            .assign_user_role(session.token(), user_id, role_id)
            .await?;
        info!(user_id, role_id, "role assigned");

        self.finish(
            session,
            "Role assigned successfully!",
            assignment,
            &[QueryKey::UserRoles, QueryKey::Users],
        )
        .await
    }

    async fn ensure_role_mutable(&self, session: &ConsoleSession, role_id: &str) -> AppResult<()> {
        let snapshot = self.load_snapshot(session).await?;
        snapshot.find_role(role_id)?.ensure_mutable_by(session.role())
    }

    async fn finish<T>(
        &self,
        session: &ConsoleSession,
        message: &'static str,
        value: T,
        invalidated: &[QueryKey],
    ) -> AppResult<RbacMutationOutcome<T>> {
        self.cache.invalidate(invalidated).await;
        let snapshot = match self.load_snapshot(session).await {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!(error = %error, "rbac mutation applied but snapshot refetch failed");
                None
            }
        };

        Ok(RbacMutationOutcome {
            message,
            value,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests;
