use async_trait::async_trait;
use reqwest::Method;

use evep_application::SettingsGateway;
use evep_core::{AppResult, BearerToken};
use evep_domain::AdminSettings;

use super::HttpPlatformClient;

const SETTINGS_PATH: &str = "/api/v1/admin/settings";

#[async_trait]
impl SettingsGateway for HttpPlatformClient {
    async fn settings(&self, token: &BearerToken) -> AppResult<AdminSettings> {
        self.get_json(token, SETTINGS_PATH, &[], "settings").await
    }

    async fn update_settings(
        &self,
        token: &BearerToken,
        settings: &AdminSettings,
    ) -> AppResult<AdminSettings> {
        self.send_json(Method::PUT, token, SETTINGS_PATH, settings, "settings")
            .await
    }
}
