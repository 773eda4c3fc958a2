use async_trait::async_trait;
use serde::Deserialize;

use evep_application::IdentityGateway;
use evep_core::{AppResult, BearerToken, ConsoleIdentity};

use super::HttpPlatformClient;

#[derive(Debug, Deserialize)]
struct CurrentUserPayload {
    #[serde(alias = "user_id", alias = "_id")]
    id: String,
    email: String,
    #[serde(default, alias = "full_name")]
    name: String,
    role: String,
}

#[async_trait]
impl IdentityGateway for HttpPlatformClient {
    async fn current_identity(&self, token: &BearerToken) -> AppResult<ConsoleIdentity> {
        let payload: CurrentUserPayload = self
            .get_json(token, "/api/v1/auth/me", &[], "user")
            .await?;

        Ok(ConsoleIdentity::new(
            payload.id,
            payload.email,
            payload.name,
            payload.role,
        ))
    }
}
