use std::sync::Arc;

use tracing::{info, warn};

use evep_core::{AppError, AppResult, BearerToken, ConsoleIdentity};
use evep_domain::{
    NavigationEntry, ScreeningType, has_menu_access, visible_navigation, visible_screening_types,
};

use crate::{ConsoleSession, IdentityGateway, QueryCache, QueryKey};

/// Fails with `Forbidden` when the role gate hides `path` from the caller.
///
/// The gate mirrors what the console shows; the platform still authorizes
/// every forwarded call on its own.
pub fn require_menu_access(session: &ConsoleSession, path: &str) -> AppResult<()> {
    if has_menu_access(session.role(), path) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "role '{}' has no access to '{path}'",
        session.role()
    )))
}

/// Application service resolving callers and their visible console surface.
#[derive(Clone)]
pub struct AccessService {
    identity_gateway: Arc<dyn IdentityGateway>,
    cache: Arc<QueryCache>,
}

impl AccessService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(identity_gateway: Arc<dyn IdentityGateway>, cache: Arc<QueryCache>) -> Self {
        Self {
            identity_gateway,
            cache,
        }
    }

    /// Resolves the platform user behind a bearer token.
    ///
    /// Tokens whose `exp` claim has passed are rejected without a network call.
    pub async fn open_session(&self, token: BearerToken) -> AppResult<ConsoleSession> {
        if token.is_expired() {
            info!(token = ?token, "rejected expired bearer token");
            return Err(AppError::Unauthorized(
                "access token has expired; sign in again".to_owned(),
            ));
        }

        let scope = token.fingerprint();
        let identity: ConsoleIdentity = self
            .cache
            .get_or_fetch(&scope, QueryKey::Identity, "", || {
                self.identity_gateway.current_identity(&token)
            })
            .await
            .inspect_err(|error| {
                warn!(token = ?token, error = %error, "failed to resolve console identity");
            })?;

        Ok(ConsoleSession::new(token, identity))
    }

    /// Forgets the cached identity of a caller.
    pub async fn close_session(&self, session: &ConsoleSession) {
        self.cache.invalidate_scope(&session.cache_scope()).await;
    }

    /// Returns the navigation entries the caller may see.
    #[must_use]
    pub fn navigation(&self, session: &ConsoleSession) -> Vec<NavigationEntry> {
        visible_navigation(session.role())
    }

    /// Returns the screening buttons the caller may see.
    #[must_use]
    pub fn screening_types(&self, session: &ConsoleSession) -> Vec<ScreeningType> {
        visible_screening_types(session.role())
    }
}
