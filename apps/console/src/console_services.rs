use std::sync::Arc;
use std::time::Duration;

use evep_application::{
    AccessService, DashboardGateway, DashboardService, IdentityGateway, QueryCache, RbacAdminService,
    RbacGateway, ScreeningGateway, ScreeningService, SettingsGateway, SettingsService,
    UserAdminService, UserDirectoryGateway,
};
use evep_core::AppResult;
use evep_infrastructure::{HttpPlatformClient, InMemoryPlatform};
use tracing::warn;

use crate::console_config::{ConsoleConfig, PlatformBackend};
use crate::state::AppState;

pub async fn build_app_state(config: &ConsoleConfig) -> AppResult<AppState> {
    match &config.platform_backend {
        PlatformBackend::Http { base_url, timeout } => Ok(app_state_for(
            Arc::new(HttpPlatformClient::new(base_url, *timeout)?),
            config.query_cache_ttl,
            config.wizard_ttl,
        )),
        PlatformBackend::Memory => {
            warn!("using the seeded in-memory platform; data is lost on restart");
            Ok(app_state_for(
                Arc::new(InMemoryPlatform::seeded().await),
                config.query_cache_ttl,
                config.wizard_ttl,
            ))
        }
    }
}

/// Wires every service to one platform adapter sharing one query cache.
pub fn app_state_for<P>(
    platform: Arc<P>,
    query_cache_ttl: Duration,
    wizard_ttl: Duration,
) -> AppState
where
    P: IdentityGateway
        + RbacGateway
        + UserDirectoryGateway
        + ScreeningGateway
        + DashboardGateway
        + SettingsGateway
        + 'static,
{
    let cache = Arc::new(QueryCache::new(query_cache_ttl));

    AppState {
        access_service: AccessService::new(platform.clone(), cache.clone()),
        rbac_admin_service: RbacAdminService::new(platform.clone(), cache.clone()),
        user_admin_service: UserAdminService::new(platform.clone(), cache.clone()),
        screening_service: ScreeningService::new(platform.clone(), cache.clone())
            .with_wizard_ttl(wizard_ttl),
        dashboard_service: DashboardService::new(platform.clone(), cache.clone()),
        settings_service: SettingsService::new(platform, cache),
    }
}
