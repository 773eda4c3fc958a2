use std::collections::BTreeMap;

use evep_application::{RbacMutationOutcome, RbacSnapshot};
use evep_domain::{PermissionRecord, RoleForm, RoleRecord, UserRoleAssignment};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role create/edit dialog payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/role-request.ts"
)]
pub struct RoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<RoleRequest> for RoleForm {
    fn from(value: RoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description.unwrap_or_default(),
            permissions: value.permissions,
        }
    }
}

/// Incoming payload for user role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/assign-user-role-request.ts"
)]
pub struct AssignUserRoleRequest {
    pub user_id: String,
    pub role_id: String,
}

/// API representation of a permission.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub resource: String,
    pub action: String,
}

impl From<PermissionRecord> for PermissionResponse {
    fn from(value: PermissionRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            category: value.category,
            resource: value.resource,
            action: value.action,
        }
    }
}

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub is_system: bool,
    /// Whether edit and delete buttons are enabled for the caller.
    pub editable: bool,
}

impl RoleResponse {
    pub fn for_actor(role: RoleRecord, actor_role: &str) -> Self {
        Self {
            editable: role.is_mutable_by(actor_role),
            id: role.id,
            name: role.name,
            description: role.description,
            permissions: role.permissions,
            is_system: role.is_system,
        }
    }
}

/// API representation of a user-to-role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/user-role-assignment-response.ts"
)]
pub struct UserRoleAssignmentResponse {
    pub user_id: String,
    pub role_id: String,
    pub assigned_at: Option<String>,
}

impl From<UserRoleAssignment> for UserRoleAssignmentResponse {
    fn from(value: UserRoleAssignment) -> Self {
        Self {
            user_id: value.user_id,
            role_id: value.role_id,
            assigned_at: value.assigned_at,
        }
    }
}

/// Everything the roles & permissions page renders.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/rbac-snapshot-response.ts"
)]
pub struct RbacSnapshotResponse {
    pub roles: Vec<RoleResponse>,
    pub permissions: Vec<PermissionResponse>,
    pub permission_groups: BTreeMap<String, Vec<PermissionResponse>>,
    pub user_roles: Vec<UserRoleAssignmentResponse>,
    /// Role id to granted permission ids missing from the catalog.
    pub unknown_permissions: BTreeMap<String, Vec<String>>,
}

impl RbacSnapshotResponse {
    pub fn for_actor(snapshot: RbacSnapshot, actor_role: &str) -> Self {
        let permission_groups = snapshot
            .permission_groups()
            .into_iter()
            .map(|(category, permissions)| {
                (
                    category,
                    permissions.into_iter().map(PermissionResponse::from).collect(),
                )
            })
            .collect();
        let unknown_permissions = snapshot.unknown_permissions();

        Self {
            roles: snapshot
                .roles
                .into_iter()
                .map(|role| RoleResponse::for_actor(role, actor_role))
                .collect(),
            permissions: snapshot
                .permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
            permission_groups,
            user_roles: snapshot
                .user_roles
                .into_iter()
                .map(UserRoleAssignmentResponse::from)
                .collect(),
            unknown_permissions,
        }
    }
}

/// Success message plus the refetched snapshot.
///
/// `snapshot` is null when the mutation was applied but the refetch failed;
/// the UI then reloads `/console/rbac` itself.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/rbac-mutation-response.ts"
)]
pub struct RbacMutationResponse {
    pub message: String,
    pub snapshot: Option<RbacSnapshotResponse>,
}

impl RbacMutationResponse {
    pub fn from_outcome<T>(outcome: RbacMutationOutcome<T>, actor_role: &str) -> Self {
        Self {
            message: outcome.message.to_owned(),
            snapshot: outcome
                .snapshot
                .map(|snapshot| RbacSnapshotResponse::for_actor(snapshot, actor_role)),
        }
    }
}
