use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use evep_application::ScreeningGateway;
use evep_core::{AppResult, BearerToken};
use evep_domain::{ScreeningSession, ScreeningStatus, ScreeningSubmission, SessionListQuery};

use super::{HttpPlatformClient, resource_path};

const SESSIONS_PATH: &str = "/api/v1/screenings/sessions";

#[derive(Debug, Serialize)]
struct SessionStatusPayload {
    status: ScreeningStatus,
}

fn session_path(session_id: &str) -> AppResult<String> {
    resource_path(SESSIONS_PATH, session_id, false)
}

#[async_trait]
impl ScreeningGateway for HttpPlatformClient {
    async fn list_sessions(
        &self,
        token: &BearerToken,
        query: &SessionListQuery,
    ) -> AppResult<Vec<ScreeningSession>> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_owned()));
        }

        self.get_json(token, SESSIONS_PATH, &params, "sessions")
            .await
    }

    async fn find_session(
        &self,
        token: &BearerToken,
        session_id: &str,
    ) -> AppResult<ScreeningSession> {
        self.get_json(token, &session_path(session_id)?, &[], "session")
            .await
    }

    async fn create_session(
        &self,
        token: &BearerToken,
        submission: &ScreeningSubmission,
    ) -> AppResult<ScreeningSession> {
        self.send_json(Method::POST, token, SESSIONS_PATH, submission, "session")
            .await
    }

    async fn update_session_status(
        &self,
        token: &BearerToken,
        session_id: &str,
        status: ScreeningStatus,
    ) -> AppResult<ScreeningSession> {
        self.send_json(
            Method::PUT,
            token,
            &session_path(session_id)?,
            &SessionStatusPayload { status },
            "session",
        )
        .await
    }
}
