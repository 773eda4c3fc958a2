use std::fmt::{Debug, Formatter};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppError, AppResult};

const BEARER_SCHEME: &str = "bearer";

/// Opaque platform access token forwarded on every upstream request.
///
/// The console never verifies the token signature; the platform does. The
/// expiry helpers only decode the `exp` claim so the console can reject a
/// stale token before spending a network round trip on it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl BearerToken {
    /// Creates a token from its raw string form.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(AppError::Unauthorized("bearer token is empty".to_owned()));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(AppError::Unauthorized(
                "bearer token must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Parses an `Authorization` header value of the form `Bearer <token>`.
    pub fn from_authorization_header(value: &str) -> AppResult<Self> {
        let (scheme, token) = value.trim().split_once(' ').ok_or_else(|| {
            AppError::Unauthorized("authorization header must use the Bearer scheme".to_owned())
        })?;

        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return Err(AppError::Unauthorized(format!(
                "unsupported authorization scheme '{scheme}'"
            )));
        }

        Self::new(token)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the value for an upstream `Authorization` header.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a short stable digest usable as a cache partition key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..8])
    }

    /// Returns the `exp` claim when the token is a decodable JWT.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.0.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: ExpiryClaims = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(claims.exp?, 0)
    }

    /// Returns whether the token carries an `exp` claim at or before `now`.
    ///
    /// Opaque tokens without a readable expiry are treated as live.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }

    /// Returns whether the token has expired according to the local clock.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl Debug for BearerToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "BearerToken({})", self.fingerprint())
    }
}

/// Platform user behind the current console request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleIdentity {
    user_id: String,
    email: String,
    name: String,
    role: String,
}

impl ConsoleIdentity {
    /// Creates an identity from the platform's current-user payload.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
            role: role.into(),
        }
    }

    /// Returns the platform user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the user's email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the platform role name, e.g. `super_admin`.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::{DateTime, Utc};

    use super::BearerToken;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u-1","exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap_or_default()
    }

    #[test]
    fn parses_bearer_header_case_insensitively() {
        let token = BearerToken::from_authorization_header("bearer abc.def.ghi");
        assert_eq!(
            token.map(|token| token.as_str().to_owned()).ok().as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert!(BearerToken::from_authorization_header("Basic dXNlcjpwYXNz").is_err());
        assert!(BearerToken::from_authorization_header("Bearer    ").is_err());
        assert!(BearerToken::from_authorization_header("token-without-scheme").is_err());
    }

    #[test]
    fn jwt_expiry_is_read_from_exp_claim() {
        let token = BearerToken::new(jwt_with_exp(1_700_000_000));
        let Ok(token) = token else {
            panic!("token should parse");
        };

        assert_eq!(token.expires_at(), Some(at(1_700_000_000)));
        assert!(token.is_expired_at(at(1_700_000_000)));
        assert!(!token.is_expired_at(at(1_699_999_999)));
    }

    #[test]
    fn opaque_tokens_never_report_expiry() {
        let Ok(token) = BearerToken::new("opaque-session-token") else {
            panic!("token should parse");
        };

        assert_eq!(token.expires_at(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn debug_output_hides_raw_token() {
        let Ok(token) = BearerToken::new("super-secret-value") else {
            panic!("token should parse");
        };

        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert_eq!(token.fingerprint().len(), 16);
    }
}
