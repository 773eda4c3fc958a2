use evep_domain::AdminSettings;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Platform settings as edited on the settings page.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/settings-dto.ts"
)]
pub struct SettingsDto {
    pub system_name: String,
    pub session_timeout_minutes: u32,
    pub auto_refresh_seconds: u32,
    pub max_login_attempts: u32,
    pub maintenance_mode: bool,
    pub email_notifications: bool,
}

impl From<AdminSettings> for SettingsDto {
    fn from(value: AdminSettings) -> Self {
        Self {
            system_name: value.system_name,
            session_timeout_minutes: value.session_timeout_minutes,
            auto_refresh_seconds: value.auto_refresh_seconds,
            max_login_attempts: value.max_login_attempts,
            maintenance_mode: value.maintenance_mode,
            email_notifications: value.email_notifications,
        }
    }
}

impl From<SettingsDto> for AdminSettings {
    fn from(value: SettingsDto) -> Self {
        Self {
            system_name: value.system_name,
            session_timeout_minutes: value.session_timeout_minutes,
            auto_refresh_seconds: value.auto_refresh_seconds,
            max_login_attempts: value.max_login_attempts,
            maintenance_mode: value.maintenance_mode,
            email_notifications: value.email_notifications,
        }
    }
}

/// Result of a settings save.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/settings-update-response.ts"
)]
pub struct SettingsUpdateResponse {
    pub message: String,
    pub settings: SettingsDto,
}
