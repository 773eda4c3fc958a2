use async_trait::async_trait;

use evep_application::DashboardGateway;
use evep_core::{AppResult, BearerToken};
use evep_domain::DashboardStats;

use super::HttpPlatformClient;

#[async_trait]
impl DashboardGateway for HttpPlatformClient {
    async fn dashboard_stats(&self, token: &BearerToken) -> AppResult<DashboardStats> {
        self.get_json(token, "/api/v1/dashboard/stats", &[], "stats")
            .await
    }
}
