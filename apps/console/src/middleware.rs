use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use evep_core::{AppError, BearerToken};

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the caller's bearer token into a `ConsoleSession` extension.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("authorization header is not valid text".to_owned()))?;

    let token = BearerToken::from_authorization_header(header_value)?;
    let session = state.access_service.open_session(token).await?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
