use std::sync::Arc;

use tracing::warn;

use evep_core::{AppError, AppResult};
use evep_domain::DashboardView;

use crate::{ConsoleSession, DashboardGateway, QueryCache, QueryKey, require_menu_access};

/// Application service for the dashboard counters.
#[derive(Clone)]
pub struct DashboardService {
    gateway: Arc<dyn DashboardGateway>,
    cache: Arc<QueryCache>,
}

impl DashboardService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(gateway: Arc<dyn DashboardGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Returns live counters, or a degraded view when the platform is
    /// unreachable or fails internally.
    ///
    /// Auth and request errors propagate so an expired session still ends
    /// in a login redirect. A degraded view never carries made-up numbers.
    pub async fn dashboard(&self, session: &ConsoleSession) -> AppResult<DashboardView> {
        require_menu_access(session, "/dashboard")?;

        let result = self
            .cache
            .get_or_fetch(&session.cache_scope(), QueryKey::DashboardStats, "", || {
                self.gateway.dashboard_stats(session.token())
            })
            .await;

        match result {
            Ok(stats) => Ok(DashboardView::Live { stats }),
            Err(error @ (AppError::Unavailable(_) | AppError::Internal(_))) => {
                warn!(error = %error, "dashboard stats unavailable");
                Ok(DashboardView::Degraded {
                    reason: error.to_string(),
                })
            }
            Err(error) => Err(error),
        }
    }
}
