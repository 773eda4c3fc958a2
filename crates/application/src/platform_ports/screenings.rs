use async_trait::async_trait;

use evep_core::{AppResult, BearerToken};
use evep_domain::{ScreeningSession, ScreeningStatus, ScreeningSubmission, SessionListQuery};

/// Port for the screening session endpoints.
#[async_trait]
pub trait ScreeningGateway: Send + Sync {
    /// Lists one page of sessions.
    async fn list_sessions(
        &self,
        token: &BearerToken,
        query: &SessionListQuery,
    ) -> AppResult<Vec<ScreeningSession>>;

    /// Reads one session.
    async fn find_session(
        &self,
        token: &BearerToken,
        session_id: &str,
    ) -> AppResult<ScreeningSession>;

    /// Persists a completed wizard run.
    async fn create_session(
        &self,
        token: &BearerToken,
        submission: &ScreeningSubmission,
    ) -> AppResult<ScreeningSession>;

    /// Writes a new status.
    async fn update_session_status(
        &self,
        token: &BearerToken,
        session_id: &str,
        status: ScreeningStatus,
    ) -> AppResult<ScreeningSession>;
}
