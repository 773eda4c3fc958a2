use async_trait::async_trait;

use evep_core::{AppResult, BearerToken};
use evep_domain::DashboardStats;

/// Port for dashboard counters.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// Reads the headline counters.
    async fn dashboard_stats(&self, token: &BearerToken) -> AppResult<DashboardStats>;
}
