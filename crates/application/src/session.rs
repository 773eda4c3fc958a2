use evep_core::{BearerToken, ConsoleIdentity};

/// Authenticated caller of a console request.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    token: BearerToken,
    identity: ConsoleIdentity,
}

impl ConsoleSession {
    /// Pairs a forwarded token with the identity it resolved to.
    #[must_use]
    pub fn new(token: BearerToken, identity: ConsoleIdentity) -> Self {
        Self { token, identity }
    }

    /// Returns the token forwarded to the platform.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns the resolved identity.
    #[must_use]
    pub fn identity(&self) -> &ConsoleIdentity {
        &self.identity
    }

    /// Returns the caller's role name.
    #[must_use]
    pub fn role(&self) -> &str {
        self.identity.role()
    }

    /// Returns the cache partition for this caller.
    #[must_use]
    pub fn cache_scope(&self) -> String {
        self.token.fingerprint()
    }
}
