use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Atomic `(resource, action)` capability tag shown in the role editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Platform-wide unique identifier.
    pub id: String,
    /// Human readable label.
    pub name: String,
    /// Longer explanation shown next to the checkbox.
    #[serde(default)]
    pub description: String,
    /// Grouping used by the permission picker, e.g. `screening`.
    pub category: String,
    /// Resource the permission applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
}

impl PermissionRecord {
    /// Builds a record from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }
}

/// `(id, name, description, category, resource, action)`
type CatalogRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const BUILTIN_CATALOG: &[CatalogRow] = &[
    (
        "dashboard.view",
        "View Dashboard",
        "Open the statistics dashboard",
        "dashboard",
        "dashboard",
        "read",
    ),
    (
        "patient.read",
        "View Patients",
        "List and open patient records",
        "patient",
        "patient",
        "read",
    ),
    (
        "patient.create",
        "Create Patients",
        "Register new patients",
        "patient",
        "patient",
        "create",
    ),
    (
        "patient.update",
        "Edit Patients",
        "Change patient demographics",
        "patient",
        "patient",
        "update",
    ),
    (
        "patient.delete",
        "Delete Patients",
        "Remove patient records",
        "patient",
        "patient",
        "delete",
    ),
    (
        "screening.read",
        "View Screenings",
        "List screening sessions and results",
        "screening",
        "screening_session",
        "read",
    ),
    (
        "screening.conduct",
        "Conduct Screenings",
        "Run the screening workflow",
        "screening",
        "screening_session",
        "create",
    ),
    (
        "screening.update",
        "Update Screenings",
        "Change screening status and results",
        "screening",
        "screening_session",
        "update",
    ),
    (
        "screening.enhanced",
        "Enhanced Screenings",
        "Run enhanced screenings with specialist equipment",
        "screening",
        "screening_session",
        "enhanced",
    ),
    (
        "screening.mobile_unit",
        "Mobile Unit Screenings",
        "Run screenings from a mobile unit",
        "screening",
        "screening_session",
        "mobile_unit",
    ),
    (
        "report.read",
        "View Reports",
        "Open screening reports",
        "report",
        "report",
        "read",
    ),
    (
        "report.export",
        "Export Reports",
        "Download reports as files",
        "report",
        "report",
        "export",
    ),
    (
        "user.read",
        "View Users",
        "List console users",
        "user",
        "user",
        "read",
    ),
    (
        "user.manage",
        "Manage Users",
        "Create, edit and deactivate users",
        "user",
        "user",
        "manage",
    ),
    (
        "rbac.role.read",
        "View Roles",
        "List roles and their permissions",
        "rbac",
        "role",
        "read",
    ),
    (
        "rbac.role.manage",
        "Manage Roles",
        "Create, edit and delete roles",
        "rbac",
        "role",
        "manage",
    ),
    (
        "rbac.user_role.assign",
        "Assign Roles",
        "Change which role a user holds",
        "rbac",
        "user_role",
        "assign",
    ),
    (
        "system.settings",
        "System Settings",
        "Change platform settings",
        "system",
        "settings",
        "update",
    ),
    (
        "system.audit",
        "Audit Logs",
        "Read the audit trail",
        "system",
        "audit_log",
        "read",
    ),
];

/// Returns the permission catalog that ships with the console.
#[must_use]
pub fn builtin_permission_catalog() -> Vec<PermissionRecord> {
    BUILTIN_CATALOG
        .iter()
        .map(|(id, name, description, category, resource, action)| {
            PermissionRecord::new(*id, *name, *description, *category, *resource, *action)
        })
        .collect()
}

/// Merges the local catalog with server records.
///
/// Local records come first and the first occurrence of each id wins, so a
/// server record whose id collides with a catalog entry is dropped.
#[must_use]
pub fn merge_permission_catalog(
    local: &[PermissionRecord],
    server: &[PermissionRecord],
) -> Vec<PermissionRecord> {
    let mut seen: HashSet<String> = HashSet::new();

    local
        .iter()
        .chain(server)
        .filter(|permission| seen.insert(permission.id.clone()))
        .cloned()
        .collect()
}

/// Groups permissions by category, keeping input order inside each group.
#[must_use]
pub fn group_permissions_by_category(
    permissions: &[PermissionRecord],
) -> BTreeMap<String, Vec<PermissionRecord>> {
    let mut groups: BTreeMap<String, Vec<PermissionRecord>> = BTreeMap::new();
    for permission in permissions {
        groups
            .entry(permission.category.clone())
            .or_default()
            .push(permission.clone());
    }

    groups
}
