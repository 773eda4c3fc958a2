use std::sync::Arc;

use tracing::info;

use evep_core::AppResult;
use evep_domain::AdminSettings;

use crate::{ConsoleSession, QueryCache, QueryKey, SettingsGateway, require_menu_access};

const SETTINGS_PATH: &str = "/settings";

/// Application service for platform settings.
#[derive(Clone)]
pub struct SettingsService {
    gateway: Arc<dyn SettingsGateway>,
    cache: Arc<QueryCache>,
}

impl SettingsService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(gateway: Arc<dyn SettingsGateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// Reads current settings.
    pub async fn settings(&self, session: &ConsoleSession) -> AppResult<AdminSettings> {
        require_menu_access(session, SETTINGS_PATH)?;

        self.cache
            .get_or_fetch(&session.cache_scope(), QueryKey::Settings, "", || {
                self.gateway.settings(session.token())
            })
            .await
    }

    /// Validates and writes settings back.
    pub async fn update_settings(
        &self,
        session: &ConsoleSession,
        settings: AdminSettings,
    ) -> AppResult<AdminSettings> {
        require_menu_access(session, SETTINGS_PATH)?;
        settings.validate()?;

        let stored = self
            .gateway
            .update_settings(session.token(), &settings)
            .await?;
        info!(
            maintenance_mode = stored.maintenance_mode,
            "platform settings updated"
        );
        self.cache.invalidate(&[QueryKey::Settings]).await;

        Ok(stored)
    }
}
