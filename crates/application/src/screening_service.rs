use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use evep_core::{AppError, AppResult};
use evep_domain::{
    ScreeningSession, ScreeningStatus, ScreeningType, ScreeningWizard, SessionListQuery,
    WizardFields, visible_screening_types,
};

use crate::{ConsoleSession, QueryCache, QueryKey, ScreeningGateway, require_menu_access};

const SESSIONS_PATH: &str = "/screenings/sessions";

/// Idle time after which an open wizard is dropped.
pub const DEFAULT_WIZARD_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Open wizards allowed per examiner.
pub const MAX_OPEN_WIZARDS_PER_OWNER: usize = 10;

/// Wizard state returned to the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardHandle {
    /// Console-local wizard identifier.
    pub wizard_id: Uuid,
    /// Current wizard state.
    pub wizard: ScreeningWizard,
}

#[derive(Debug, Clone)]
struct WizardEntry {
    owner_id: String,
    wizard: ScreeningWizard,
    touched_at: Instant,
    submitting: bool,
}

impl WizardEntry {
    fn ensure_idle(&self, wizard_id: Uuid) -> AppResult<()> {
        if self.submitting {
            return Err(AppError::Conflict(format!(
                "screening wizard '{wizard_id}' is already being submitted"
            )));
        }

        Ok(())
    }
}

/// Application service for screening sessions and the screening wizard.
///
/// Open wizards are held in memory only and vanish on restart. A wizard
/// left untouched for longer than the wizard TTL is dropped on the next
/// wizard access.
#[derive(Clone)]
pub struct ScreeningService {
    gateway: Arc<dyn ScreeningGateway>,
    cache: Arc<QueryCache>,
    wizards: Arc<Mutex<HashMap<Uuid, WizardEntry>>>,
    wizard_ttl: Duration,
}

impl ScreeningService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(gateway: Arc<dyn ScreeningGateway>, cache: Arc<QueryCache>) -> Self {
        Self {
            gateway,
            cache,
            wizards: Arc::new(Mutex::new(HashMap::new())),
            wizard_ttl: DEFAULT_WIZARD_TTL,
        }
    }

    /// Overrides the idle time after which open wizards are dropped.
    #[must_use]
    pub fn with_wizard_ttl(mut self, wizard_ttl: Duration) -> Self {
        self.wizard_ttl = wizard_ttl;
        self
    }

    /// Lists one page of sessions.
    pub async fn list_sessions(
        &self,
        session: &ConsoleSession,
        query: &SessionListQuery,
    ) -> AppResult<Vec<ScreeningSession>> {
        require_menu_access(session, SESSIONS_PATH)?;

        let params = format!(
            "page={}&limit={}&status={}",
            query.page,
            query.limit,
            query.status.map(|status| status.as_str()).unwrap_or_default()
        );
        self.cache
            .get_or_fetch(&session.cache_scope(), QueryKey::Sessions, &params, || {
                self.gateway.list_sessions(session.token(), query)
            })
            .await
    }

    /// Moves a session to a new status.
    ///
    /// Terminal sessions and backwards moves are refused before the write.
    pub async fn update_session_status(
        &self,
        session: &ConsoleSession,
        session_id: &str,
        next: ScreeningStatus,
    ) -> AppResult<ScreeningSession> {
        require_menu_access(session, SESSIONS_PATH)?;

        let current = self.gateway.find_session(session.token(), session_id).await?;
        current.status.ensure_transition_to(next)?;

        let updated = self
            .gateway
            .update_session_status(session.token(), session_id, next)
            .await?;
        info!(
            session_id,
            from = current.status.as_str(),
            to = updated.status.as_str(),
            "screening status changed"
        );
        self.cache
            .invalidate(&[QueryKey::Sessions, QueryKey::DashboardStats])
            .await;

        Ok(updated)
    }

    /// Opens a wizard for a screening type visible to the caller.
    pub async fn start_wizard(
        &self,
        session: &ConsoleSession,
        screening_type: ScreeningType,
    ) -> AppResult<WizardHandle> {
        if !visible_screening_types(session.role()).contains(&screening_type) {
            return Err(AppError::Forbidden(format!(
                "role '{}' cannot run {} screenings",
                session.role(),
                screening_type.label()
            )));
        }

        let owner_id = session.identity().user_id();
        let mut wizards = self.open_wizards().await;
        let open_for_owner = wizards
            .values()
            .filter(|entry| entry.owner_id == owner_id)
            .count();
        if open_for_owner >= MAX_OPEN_WIZARDS_PER_OWNER {
            return Err(AppError::Conflict(format!(
                "{open_for_owner} screening wizards are already open; complete or discard one first"
            )));
        }

        let wizard_id = Uuid::new_v4();
        let wizard = ScreeningWizard::new(screening_type);
        wizards.insert(
            wizard_id,
            WizardEntry {
                owner_id: owner_id.to_owned(),
                wizard: wizard.clone(),
                touched_at: Instant::now(),
                submitting: false,
            },
        );
        drop(wizards);
        info!(%wizard_id, screening_type = screening_type.as_str(), "screening wizard started");

        Ok(WizardHandle { wizard_id, wizard })
    }

    /// Returns the current state of a wizard.
    pub async fn wizard(&self, session: &ConsoleSession, wizard_id: Uuid) -> AppResult<WizardHandle> {
        let mut wizards = self.open_wizards().await;
        let entry = owned_entry(&mut wizards, session, wizard_id)?;
        entry.touched_at = Instant::now();

        Ok(WizardHandle {
            wizard_id,
            wizard: entry.wizard.clone(),
        })
    }

    /// Merges edited fields.
    pub async fn update_wizard(
        &self,
        session: &ConsoleSession,
        wizard_id: Uuid,
        patch: WizardFields,
    ) -> AppResult<WizardHandle> {
        self.with_wizard(session, wizard_id, |wizard| wizard.update(patch))
            .await
    }

    /// Advances one step.
    ///
    /// A missing field leaves the step in place; the banner is kept in the
    /// stored wizard and the validation error is returned.
    pub async fn next_step(
        &self,
        session: &ConsoleSession,
        wizard_id: Uuid,
    ) -> AppResult<WizardHandle> {
        self.with_wizard(session, wizard_id, |wizard| wizard.next().map(|_| ()))
            .await
    }

    /// Moves one step back.
    pub async fn previous_step(
        &self,
        session: &ConsoleSession,
        wizard_id: Uuid,
    ) -> AppResult<WizardHandle> {
        self.with_wizard(session, wizard_id, |wizard| wizard.back().map(|_| ()))
            .await
    }

    /// Submits the wizard as a completed session.
    ///
    /// The wizard is marked as submitting before the platform call, so a
    /// second submit of the same wizard fails with `Conflict` instead of
    /// creating another session. On failure the wizard stays open on the
    /// last step with the error set. On success it is closed and the created
    /// session returned.
    pub async fn complete_wizard(
        &self,
        session: &ConsoleSession,
        wizard_id: Uuid,
    ) -> AppResult<ScreeningSession> {
        let submission = {
            let mut wizards = self.open_wizards().await;
            let entry = owned_entry(&mut wizards, session, wizard_id)?;
            entry.ensure_idle(wizard_id)?;
            let submission = entry.wizard.submission()?;
            entry.submitting = true;
            entry.touched_at = Instant::now();
            submission
        };

        match self
            .gateway
            .create_session(session.token(), &submission)
            .await
        {
            Ok(created) => {
                self.wizards.lock().await.remove(&wizard_id);

                info!(%wizard_id, session_id = %created.id, "screening submitted");
                self.cache
                    .invalidate(&[QueryKey::Sessions, QueryKey::DashboardStats])
                    .await;
                Ok(created)
            }
            Err(error) => {
                warn!(%wizard_id, error = %error, "screening submission failed");
                let mut wizards = self.wizards.lock().await;
                if let Ok(entry) = owned_entry(&mut wizards, session, wizard_id) {
                    entry.submitting = false;
                    entry.touched_at = Instant::now();
                    entry.wizard.record_submission_failure(error.to_string());
                }
                Err(error)
            }
        }
    }

    /// Closes a wizard without submitting.
    pub async fn discard_wizard(&self, session: &ConsoleSession, wizard_id: Uuid) -> AppResult<()> {
        let mut wizards = self.open_wizards().await;
        owned_entry(&mut wizards, session, wizard_id)?.ensure_idle(wizard_id)?;
        wizards.remove(&wizard_id);
        Ok(())
    }

    /// Locks the wizard map after dropping wizards idle past the TTL.
    async fn open_wizards(&self) -> MutexGuard<'_, HashMap<Uuid, WizardEntry>> {
        let mut wizards = self.wizards.lock().await;
        let before = wizards.len();
        wizards.retain(|_, entry| entry.submitting || entry.touched_at.elapsed() < self.wizard_ttl);

        let expired = before - wizards.len();
        if expired > 0 {
            debug!(expired, "dropped idle screening wizards");
        }

        wizards
    }

    async fn with_wizard<F>(
        &self,
        session: &ConsoleSession,
        wizard_id: Uuid,
        action: F,
    ) -> AppResult<WizardHandle>
    where
        F: FnOnce(&mut ScreeningWizard) -> AppResult<()>,
    {
        let mut wizards = self.open_wizards().await;
        let entry = owned_entry(&mut wizards, session, wizard_id)?;
        entry.ensure_idle(wizard_id)?;
        entry.touched_at = Instant::now();
        action(&mut entry.wizard)?;

        Ok(WizardHandle {
            wizard_id,
            wizard: entry.wizard.clone(),
        })
    }
}

fn owned_entry<'a>(
    wizards: &'a mut HashMap<Uuid, WizardEntry>,
    session: &ConsoleSession,
    wizard_id: Uuid,
) -> AppResult<&'a mut WizardEntry> {
    match wizards.get_mut(&wizard_id) {
        Some(entry) if entry.owner_id == session.identity().user_id() => Ok(entry),
        _ => Err(AppError::NotFound(format!(
            "screening wizard '{wizard_id}' does not exist"
        ))),
    }
}
