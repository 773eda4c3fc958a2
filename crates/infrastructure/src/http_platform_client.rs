use std::time::Duration;

use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use evep_core::{AppError, AppResult, BearerToken};

mod dashboard;
mod identity;
mod rbac;
mod screenings;
mod settings;
mod users;

/// Platform REST client forwarding the caller's bearer token.
///
/// Every response is decoded against the expected shape. A body may be the
/// bare value or an object wrapping it under a named key; anything else
/// fails with `Internal` instead of rendering as empty data.
#[derive(Debug, Clone)]
pub struct HttpPlatformClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpPlatformClient {
    /// Creates a client for the platform at `base_url`.
    pub fn new(base_url: &Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http_client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &BearerToken,
        path: &str,
        query: &[(&str, String)],
        envelope: &str,
    ) -> AppResult<T> {
        let mut url = Url::parse(&self.endpoint(path)).map_err(|error| {
            AppError::Internal(format!("invalid platform url for {path}: {error}"))
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let request = self
            .http_client
            .get(url)
            .header(header::AUTHORIZATION, token.authorization_value());

        let body = self.execute(request, &Method::GET, path).await?;
        decode_envelope(body, path, envelope)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        token: &BearerToken,
        path: &str,
        payload: &B,
        envelope: &str,
    ) -> AppResult<T> {
        let request = self
            .http_client
            .request(method.clone(), self.endpoint(path))
            .header(header::AUTHORIZATION, token.authorization_value())
            .json(payload);

        let body = self.execute(request, &method, path).await?;
        decode_envelope(body, path, envelope)
    }

    async fn delete(&self, token: &BearerToken, path: &str) -> AppResult<()> {
        let request = self
            .http_client
            .delete(self.endpoint(path))
            .header(header::AUTHORIZATION, token.authorization_value());

        self.execute(request, &Method::DELETE, path).await.map(|_| ())
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        method: &Method,
        path: &str,
    ) -> AppResult<Value> {
        let response = request.send().await.map_err(|error| {
            warn!(%method, path, error = %error, "platform request failed");
            AppError::Unavailable(format!("failed to call platform {method} {path}: {error}"))
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "platform responded");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(status_error(status, &body, method, path));
        }

        let text = response.text().await.map_err(|error| {
            AppError::Unavailable(format!(
                "failed to read platform response for {method} {path}: {error}"
            ))
        })?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|error| {
            AppError::Internal(format!(
                "platform returned invalid json for {method} {path}: {error}"
            ))
        })
    }
}

fn status_error(status: StatusCode, body: &str, method: &Method, path: &str) -> AppError {
    let message = upstream_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    });

    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        status if status.is_server_error() => AppError::Unavailable(format!(
            "platform {method} {path} failed with status {status}: {message}"
        )),
        status => AppError::Internal(format!(
            "platform {method} {path} failed with status {status}: {message}"
        )),
    }
}

/// Pulls a human message out of an error body (`detail` or `message`).
fn upstream_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };

    ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_owned)
        .or_else(|| Some(trimmed.to_owned()))
}

/// Appends a caller-supplied id to `collection` as one escaped path segment.
///
/// Dot segments are refused and `/`, `%`, `?` and `#` are percent-encoded,
/// so an id can never address a different platform resource.
fn resource_path(collection: &str, id: &str, trailing_slash: bool) -> AppResult<String> {
    let dot_form = id.to_ascii_lowercase().replace("%2e", ".");
    if id.trim().is_empty() || dot_form == "." || dot_form == ".." {
        return Err(AppError::Validation(format!(
            "invalid platform resource id '{id}'"
        )));
    }

    let mut scratch = Url::parse("http://platform.invalid/")
        .map_err(|error| AppError::Internal(format!("invalid scratch url: {error}")))?;
    {
        let mut segments = scratch
            .path_segments_mut()
            .map_err(|()| AppError::Internal("platform path cannot hold segments".to_owned()))?;
        segments
            .clear()
            .extend(collection.split('/').filter(|segment| !segment.is_empty()))
            .push(id);
        if trailing_slash {
            segments.push("");
        }
    }

    Ok(scratch.path().to_owned())
}

fn decode_envelope<T: DeserializeOwned>(body: Value, path: &str, envelope: &str) -> AppResult<T> {
    let inner = match body {
        Value::Object(mut object) if object.contains_key(envelope) => object
            .remove(envelope)
            .unwrap_or(Value::Null),
        other => other,
    };

    serde_json::from_value(inner).map_err(|error| {
        AppError::Internal(format!(
            "unexpected response shape from platform {path}: {error}"
        ))
    })
}

#[cfg(test)]
mod tests;
