use evep_application::{
    AccessService, DashboardService, RbacAdminService, ScreeningService, SettingsService,
    UserAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub rbac_admin_service: RbacAdminService,
    pub user_admin_service: UserAdminService,
    pub screening_service: ScreeningService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
}
