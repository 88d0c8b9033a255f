use std::time::Duration;

/// Best transcript returned by a recognizer for one request
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    /// The transcribed text, possibly empty
    pub transcript: String,
    /// Provider confidence (0.0 to 1.0) when the provider reports one
    pub confidence: Option<f32>,
}

impl RecognitionResult {
    pub fn new(transcript: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }
}

/// Error types for speech recognition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum STTError {
    #[error("No speech recognized")]
    NoSpeech,
    #[error("Recognition timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// One-shot (non-streaming) speech recognition
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe a complete WAV file in the given BCP-47 locale (e.g. "ta-IN")
    ///
    /// # Errors
    /// * `STTError::NoSpeech` - the provider found nothing to transcribe
    /// * any other variant - transport, credential or provider failure
    async fn recognize(
        &self,
        wav: &[u8],
        sample_rate: u32,
        locale: &str,
    ) -> Result<RecognitionResult, STTError>;

    /// Short provider identifier used in logs
    fn provider_name(&self) -> &'static str;
}
