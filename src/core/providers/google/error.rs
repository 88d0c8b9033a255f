//! Google Cloud API error types.

use reqwest::StatusCode;

/// Error types for Google Cloud API operations.
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    /// Authentication failed (invalid credentials, expired token, bad API key)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Configuration error (unreadable credentials, malformed request)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Network-level error (timeout, DNS failure, refused connection)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Any other non-success answer from the API
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

impl GoogleError {
    /// Categorizes a non-success HTTP answer from a Google REST API.
    ///
    /// `body` is the raw response body; the `error.message` field of Google's
    /// error envelope is used when present.
    pub fn from_http_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::AuthenticationFailed(message),
            StatusCode::BAD_REQUEST => Self::ConfigurationError(message),
            StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Self::NetworkError(message),
            other => Self::ApiError {
                status: other.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for GoogleError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkError(err.to_string())
    }
}
