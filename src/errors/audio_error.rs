use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error codes for structured error responses
pub mod error_codes {
    pub const EMPTY_PAYLOAD: &str = "empty_payload";
    pub const INVALID_BASE64: &str = "invalid_base64";
    pub const DECODE_FAILED: &str = "decode_failed";
    pub const UNSUPPORTED_FORMAT: &str = "unsupported_format";
    pub const FETCH_FAILED: &str = "fetch_failed";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
}

/// Errors raised while turning caller input into a waveform
///
/// All of these are caller mistakes and answer 400.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Empty audio payload")]
    EmptyPayload,

    #[error("Invalid Base64 string: {0}")]
    InvalidBase64(String),

    #[error("Failed to decode audio data: {0}")]
    Decode(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to fetch audio: {0}")]
    Fetch(String),

    #[error("Audio payload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
}

impl AudioError {
    /// Get the error code for structured error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AudioError::EmptyPayload => error_codes::EMPTY_PAYLOAD,
            AudioError::InvalidBase64(_) => error_codes::INVALID_BASE64,
            AudioError::Decode(_) => error_codes::DECODE_FAILED,
            AudioError::UnsupportedFormat(_) => error_codes::UNSUPPORTED_FORMAT,
            AudioError::Fetch(_) => error_codes::FETCH_FAILED,
            AudioError::TooLarge { .. } => error_codes::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AudioError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.error_code(), "Rejected audio input: {}", self);

        let body = Json(json!({
            "error": self.error_code(),
            "message": self.to_string()
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
