use crate::errors::auth_error::AuthError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extract the presented key from `x-api-key` or `Authorization: Bearer`
///
/// `x-api-key` wins when both are present.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(API_KEY_HEADER)
        && let Ok(key) = value.to_str()
        && !key.is_empty()
    {
        return Some(key);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Compare two keys in constant time with respect to their contents
fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// API key middleware for protected routes
///
/// Without a configured key every request is refused, so a missing
/// `API_KEY` locks the service down instead of opening it.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let expected = state
        .config
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(AuthError::NotConfigured)?;

    let presented = presented_key(request.headers()).ok_or(AuthError::MissingApiKey)?;

    if !keys_match(presented, expected) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "API key authentication failed: key mismatch"
        );
        return Err(AuthError::InvalidApiKey);
    }

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        "API key authentication successful"
    );
    Ok(next.run(request).await)
}
