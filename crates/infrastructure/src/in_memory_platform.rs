use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use evep_application::{DashboardGateway, IdentityGateway, SettingsGateway};
use evep_core::{AppError, AppResult, BearerToken, ConsoleIdentity};
use evep_domain::{
    AdminSettings, AdminUser, DashboardStats, PermissionRecord, RoleRecord, ScreeningSession,
    ScreeningStatus, UserRoleAssignment,
};

mod rbac;
mod screenings;
mod seed;
mod users;

/// In-memory stand-in for the platform API.
///
/// Backs `PLATFORM_BACKEND=memory` and the console tests. It keeps the
/// platform's own rules (unique role names, existing ids, settings ranges)
/// but performs no authorization beyond resolving the bearer token.
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    identities: RwLock<HashMap<String, ConsoleIdentity>>,
    roles: RwLock<Vec<RoleRecord>>,
    permissions: RwLock<Vec<PermissionRecord>>,
    user_roles: RwLock<Vec<UserRoleAssignment>>,
    users: RwLock<Vec<AdminUser>>,
    sessions: RwLock<Vec<ScreeningSession>>,
    settings: RwLock<AdminSettings>,
}

impl InMemoryPlatform {
    /// Creates an empty platform with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that resolves to `identity`.
    pub async fn register_token(&self, token: impl Into<String>, identity: ConsoleIdentity) {
        self.identities.write().await.insert(token.into(), identity);
    }
}

#[async_trait]
impl IdentityGateway for InMemoryPlatform {
    async fn current_identity(&self, token: &BearerToken) -> AppResult<ConsoleIdentity> {
        self.identities
            .read()
            .await
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("could not validate credentials".to_owned()))
    }
}

#[async_trait]
impl DashboardGateway for InMemoryPlatform {
    async fn dashboard_stats(&self, _token: &BearerToken) -> AppResult<DashboardStats> {
        let sessions = self.sessions.read().await;
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let patients: HashSet<&str> = sessions
            .iter()
            .map(|session| session.patient_id.as_str())
            .collect();
        let count = |status: ScreeningStatus| {
            sessions
                .iter()
                .filter(|session| session.status == status)
                .count() as u64
        };

        Ok(DashboardStats {
            total_patients: patients.len() as u64,
            total_screenings: sessions.len() as u64,
            pending_screenings: count(ScreeningStatus::Pending),
            completed_screenings: count(ScreeningStatus::Completed),
            screenings_today: sessions
                .iter()
                .filter(|session| {
                    session
                        .created_at
                        .as_deref()
                        .is_some_and(|created_at| created_at.starts_with(&today))
                })
                .count() as u64,
            active_users: self
                .users
                .read()
                .await
                .iter()
                .filter(|user| user.is_active)
                .count() as u64,
        })
    }
}

#[async_trait]
impl SettingsGateway for InMemoryPlatform {
    async fn settings(&self, _token: &BearerToken) -> AppResult<AdminSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn update_settings(
        &self,
        _token: &BearerToken,
        settings: &AdminSettings,
    ) -> AppResult<AdminSettings> {
        settings.validate()?;
        *self.settings.write().await = settings.clone();
        Ok(settings.clone())
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
