use std::collections::HashSet;

use evep_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::PermissionRecord;

/// Role allowed to edit and delete system roles.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Role record held by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Platform role identifier.
    pub id: String,
    /// Unique role name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: String,
    /// Permission ids granted by the role.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// System roles ship with the platform and are edit-restricted.
    #[serde(default)]
    pub is_system: bool,
}

impl RoleRecord {
    /// Returns whether a caller holding `actor_role` may edit or delete this role.
    ///
    /// This mirrors the disabled edit/delete buttons of the console. The
    /// platform performs the real check.
    #[must_use]
    pub fn is_mutable_by(&self, actor_role: &str) -> bool {
        !self.is_system || actor_role == SUPER_ADMIN_ROLE
    }

    /// Fails with `Forbidden` when [`Self::is_mutable_by`] is false.
    pub fn ensure_mutable_by(&self, actor_role: &str) -> AppResult<()> {
        if self.is_mutable_by(actor_role) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "system role '{}' can only be changed by {SUPER_ADMIN_ROLE}",
            self.name
        )))
    }

    /// Lists granted ids that are missing from `catalog`.
    #[must_use]
    pub fn unknown_permission_ids(&self, catalog: &[PermissionRecord]) -> Vec<String> {
        let known: HashSet<&str> = catalog.iter().map(|entry| entry.id.as_str()).collect();
        self.permissions
            .iter()
            .filter(|id| !known.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Mapping of one user to their active role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    /// Platform user identifier.
    pub user_id: String,
    /// Assigned role identifier.
    pub role_id: String,
    /// Assignment timestamp in RFC3339, when the platform reports it.
    #[serde(default)]
    pub assigned_at: Option<String>,
}

/// Editable role fields collected by the create/edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleForm {
    /// Role name; required.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Selected permission ids in selection order.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RoleForm {
    /// Returns whether the Save action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Validates the form into a payload ready to send.
    pub fn into_draft(self) -> AppResult<RoleDraft> {
        if !self.can_submit() {
            return Err(AppError::Validation("role name is required".to_owned()));
        }

        let name = NonEmptyString::new(self.name.trim())
            .map_err(|_| AppError::Validation("role name is required".to_owned()))?;

        let description = self.description.trim().to_owned();
        let mut seen = HashSet::new();
        let permissions = self
            .permissions
            .into_iter()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        Ok(RoleDraft {
            name,
            description: (!description.is_empty()).then_some(description),
            permissions,
        })
    }
}

/// Validated role payload for create and update calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    name: NonEmptyString,
    description: Option<String>,
    permissions: Vec<String>,
}

impl RoleDraft {
    /// Returns the trimmed role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description, if one was entered.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns selected permission ids without duplicates.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}
