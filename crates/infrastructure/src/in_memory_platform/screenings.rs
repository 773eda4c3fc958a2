use async_trait::async_trait;
use uuid::Uuid;

use evep_application::ScreeningGateway;
use evep_core::{AppError, AppResult, BearerToken};
use evep_domain::{ScreeningSession, ScreeningStatus, ScreeningSubmission, SessionListQuery};

use super::{InMemoryPlatform, now_rfc3339};

#[async_trait]
impl ScreeningGateway for InMemoryPlatform {
    async fn list_sessions(
        &self,
        _token: &BearerToken,
        query: &SessionListQuery,
    ) -> AppResult<Vec<ScreeningSession>> {
        let offset = (query.page.saturating_sub(1) as usize).saturating_mul(query.limit as usize);

        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .filter(|session| query.status.is_none_or(|status| session.status == status))
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_session(
        &self,
        _token: &BearerToken,
        session_id: &str,
    ) -> AppResult<ScreeningSession> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|session| session.id == session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("screening session '{session_id}' not found")))
    }

    async fn create_session(
        &self,
        _token: &BearerToken,
        submission: &ScreeningSubmission,
    ) -> AppResult<ScreeningSession> {
        let session = ScreeningSession {
            id: Uuid::new_v4().to_string(),
            patient_id: submission.patient_id.clone(),
            examiner_id: submission.examiner_id.clone(),
            screening_type: submission.screening_type,
            status: submission.status,
            results: Some(submission.results.clone()),
            created_at: Some(now_rfc3339()),
        };
        self.sessions.write().await.push(session.clone());

        Ok(session)
    }

    async fn update_session_status(
        &self,
        _token: &BearerToken,
        session_id: &str,
        status: ScreeningStatus,
    ) -> AppResult<ScreeningSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .iter_mut()
            .find(|session| session.id == session_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("screening session '{session_id}' not found"))
            })?;
        session.status = status;

        Ok(session.clone())
    }
}
