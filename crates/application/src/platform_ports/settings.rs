use async_trait::async_trait;

use evep_core::{AppResult, BearerToken};
use evep_domain::AdminSettings;

/// Port for platform settings.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    /// Reads current settings.
    async fn settings(&self, token: &BearerToken) -> AppResult<AdminSettings>;

    /// Replaces settings and returns what was stored.
    async fn update_settings(
        &self,
        token: &BearerToken,
        settings: &AdminSettings,
    ) -> AppResult<AdminSettings>;
}
