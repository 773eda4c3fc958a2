use async_trait::async_trait;

use evep_core::{AppResult, BearerToken, ConsoleIdentity};

/// Port resolving the platform user behind a bearer token.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Returns the user the token was issued to.
    async fn current_identity(&self, token: &BearerToken) -> AppResult<ConsoleIdentity>;
}
