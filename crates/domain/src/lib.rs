//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod dashboard;
mod permission;
mod role;
mod screening;
mod settings;
mod user;
mod wizard;

pub use access::{
    NavigationEntry, ScreeningType, has_menu_access, visible_navigation, visible_screening_types,
};
pub use dashboard::{DashboardStats, DashboardView};
pub use permission::{
    PermissionRecord, builtin_permission_catalog, group_permissions_by_category,
    merge_permission_catalog,
};
pub use role::{RoleDraft, RoleForm, RoleRecord, SUPER_ADMIN_ROLE, UserRoleAssignment};
pub use screening::{ScreeningResults, ScreeningSession, ScreeningStatus, SessionListQuery};
pub use settings::AdminSettings;
pub use user::{AdminUser, UserListQuery, UserStatus};
pub use wizard::{ScreeningSubmission, ScreeningWizard, WizardFields, WizardStep};
