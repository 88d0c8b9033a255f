use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error codes for structured error responses
pub mod error_codes {
    pub const MISSING_API_KEY: &str = "missing_api_key";
    pub const INVALID_API_KEY: &str = "invalid_api_key";
    pub const UNAUTHORIZED: &str = "unauthorized";
}

/// Authentication error types
///
/// Every variant answers 401. The response body carries only a code and a
/// fixed sentence, never the presented credential or the configured one.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither `x-api-key` nor `Authorization: Bearer` was present
    #[error("Missing API key")]
    MissingApiKey,

    /// A key was presented but does not match
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The server has no API key configured, so every request is refused
    #[error("Unauthorized")]
    NotConfigured,
}

impl AuthError {
    /// Get the error code for structured error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey => error_codes::MISSING_API_KEY,
            AuthError::InvalidApiKey => error_codes::INVALID_API_KEY,
            AuthError::NotConfigured => error_codes::UNAUTHORIZED,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Log the error at the appropriate level
    pub fn log(&self) {
        match self {
            // Expected client mistakes
            AuthError::MissingApiKey => tracing::debug!("{}", self),
            AuthError::InvalidApiKey => tracing::warn!("Rejected request with invalid API key"),
            // Operator mistake: the service is locked down
            AuthError::NotConfigured => {
                tracing::error!("No API key configured; refusing protected request")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();

        // Response format: {"error": "error_code", "message": "human readable message"}
        let body = Json(json!({
            "error": self.error_code(),
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

// Result type alias for convenience
pub type AuthResult<T> = Result<T, AuthError>;
