use evep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Platform-wide settings edited on the admin settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Name shown in the console header.
    pub system_name: String,
    /// Idle minutes before a session is signed out.
    pub session_timeout_minutes: u32,
    /// Dashboard refresh hint for the UI shell; the console never polls.
    pub auto_refresh_seconds: u32,
    /// Failed sign-ins before an account is locked.
    pub max_login_attempts: u32,
    /// Blocks non-admin sign-ins while set.
    #[serde(default)]
    pub maintenance_mode: bool,
    /// Sends screening summaries by email.
    #[serde(default)]
    pub email_notifications: bool,
}

impl AdminSettings {
    /// Checks ranges before the settings are written back.
    pub fn validate(&self) -> AppResult<()> {
        if self.system_name.trim().is_empty() {
            return Err(AppError::Validation("system name is required".to_owned()));
        }

        if !(5..=1440).contains(&self.session_timeout_minutes) {
            return Err(AppError::Validation(
                "session timeout must be between 5 and 1440 minutes".to_owned(),
            ));
        }

        if self.auto_refresh_seconds != 0 && self.auto_refresh_seconds < 10 {
            return Err(AppError::Validation(
                "auto refresh must be 0 (off) or at least 10 seconds".to_owned(),
            ));
        }

        if !(1..=20).contains(&self.max_login_attempts) {
            return Err(AppError::Validation(
                "max login attempts must be between 1 and 20".to_owned(),
            ));
        }

        Ok(())
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            system_name: "EVEP".to_owned(),
            session_timeout_minutes: 30,
            auto_refresh_seconds: 60,
            max_login_attempts: 5,
            maintenance_mode: false,
            email_notifications: true,
        }
    }
}
