mod base;
pub mod google;

// Re-export public types and traits
pub use base::{RecognitionResult, STTError, SpeechRecognizer};

// Re-export Google implementation
pub use google::{GoogleSpeechAuth, GoogleSpeechConfig, GoogleSpeechRecognizer};

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;

/// Build the configured speech recognizer, if any
///
/// An API key takes precedence over OAuth2 credentials. Returns `Ok(None)`
/// when language detection is disabled or no Google credentials are set.
///
/// # Examples
/// ```rust,no_run
/// use voice_detection::config::ServerConfig;
/// use voice_detection::core::stt::create_speech_recognizer;
///
/// let config = ServerConfig {
///     google_api_key: Some("your-google-api-key".to_string()),
///     ..Default::default()
/// };
///
/// let recognizer = create_speech_recognizer(&config, reqwest::Client::new())
///     .expect("valid configuration");
/// assert!(recognizer.is_some());
/// ```
pub fn create_speech_recognizer(
    config: &ServerConfig,
    client: reqwest::Client,
) -> Result<Option<Arc<dyn SpeechRecognizer>>, STTError> {
    if !config.has_speech_recognizer() {
        info!("Speech recognition not configured, language guessing defaults to English");
        return Ok(None);
    }

    let auth = match (&config.google_api_key, &config.google_credentials) {
        (Some(key), _) => GoogleSpeechAuth::ApiKey(key.clone()),
        (None, Some(credentials)) => GoogleSpeechAuth::Credentials(credentials.clone()),
        (None, None) => return Ok(None),
    };

    let mut speech_config = GoogleSpeechConfig::new(config.speech_endpoint.clone(), auth);
    speech_config.request_timeout = config.recognition_timeout();

    let recognizer = GoogleSpeechRecognizer::new(speech_config, client)?;
    info!(endpoint = %config.speech_endpoint, "Google speech recognizer initialized");

    Ok(Some(Arc::new(recognizer)))
}
