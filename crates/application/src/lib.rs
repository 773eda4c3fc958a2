//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod dashboard_service;
mod platform_ports;
mod query_cache;
mod rbac_admin_service;
mod screening_service;
mod session;
mod settings_service;
mod user_admin_service;

pub use access_service::{AccessService, require_menu_access};
pub use dashboard_service::DashboardService;
pub use platform_ports::{
    DashboardGateway, IdentityGateway, RbacGateway, ScreeningGateway, SettingsGateway,
    UserDirectoryGateway, UserPage,
};
pub use query_cache::{QueryCache, QueryKey};
pub use rbac_admin_service::{RbacAdminService, RbacMutationOutcome, RbacSnapshot};
pub use screening_service::{ScreeningService, WizardHandle};
pub use session::ConsoleSession;
pub use settings_service::SettingsService;
pub use user_admin_service::UserAdminService;
