use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::providers::google::{
    GOOGLE_CLOUD_PLATFORM_SCOPE, GoogleAuthClient, GoogleError, TokenProvider,
};
use crate::core::stt::base::{RecognitionResult, STTError, SpeechRecognizer};

use super::config::{GoogleSpeechAuth, GoogleSpeechConfig};

/// Converts a GoogleError to an STTError.
pub(crate) fn google_error_to_stt(e: GoogleError) -> STTError {
    match e {
        GoogleError::AuthenticationFailed(msg) => STTError::AuthenticationFailed(msg),
        GoogleError::ConfigurationError(msg) => STTError::ConfigurationError(msg),
        GoogleError::NetworkError(msg) => STTError::NetworkError(msg),
        GoogleError::ApiError { status, message } => {
            STTError::ProviderError(format!("HTTP {status}: {message}"))
        }
    }
}

/// Resolved request authorization
enum Authorization {
    ApiKey(String),
    Bearer(Arc<dyn TokenProvider>),
}

/// Google Cloud Speech-to-Text v1 `speech:recognize` client.
pub struct GoogleSpeechRecognizer {
    client: reqwest::Client,
    config: GoogleSpeechConfig,
    authorization: Authorization,
}

impl std::fmt::Debug for GoogleSpeechRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match self.authorization {
            Authorization::ApiKey(_) => "api_key",
            Authorization::Bearer(_) => "oauth2",
        };
        f.debug_struct("GoogleSpeechRecognizer")
            .field("endpoint", &self.config.endpoint)
            .field("auth", &auth)
            .finish()
    }
}

impl GoogleSpeechRecognizer {
    /// Build a recognizer, loading OAuth2 credentials if configured.
    ///
    /// # Errors
    /// Returns `STTError::ConfigurationError` or `AuthenticationFailed` when
    /// the credentials cannot be loaded.
    pub fn new(config: GoogleSpeechConfig, client: reqwest::Client) -> Result<Self, STTError> {
        let authorization = match &config.auth {
            GoogleSpeechAuth::ApiKey(key) if key.trim().is_empty() => {
                return Err(STTError::ConfigurationError(
                    "Google Speech API key is empty".to_string(),
                ));
            }
            GoogleSpeechAuth::ApiKey(key) => Authorization::ApiKey(key.clone()),
            GoogleSpeechAuth::Credentials(setting) => {
                let auth_client =
                    GoogleAuthClient::from_setting(setting, &[GOOGLE_CLOUD_PLATFORM_SCOPE])
                        .map_err(google_error_to_stt)?;
                Authorization::Bearer(Arc::new(auth_client))
            }
        };

        Ok(Self {
            client,
            config,
            authorization,
        })
    }

    /// Build a recognizer that authorizes with tokens from `provider`.
    pub fn with_token_provider(
        config: GoogleSpeechConfig,
        client: reqwest::Client,
        provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            config,
            authorization: Authorization::Bearer(provider),
        }
    }

    fn build_request(&self, wav: &[u8], sample_rate: u32, locale: &str) -> RecognizeRequest {
        RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: sample_rate,
                language_code: locale.to_string(),
                max_alternatives: 1,
                model: self.config.model.clone(),
            },
            audio: RecognitionAudio {
                content: BASE64.encode(wav),
            },
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(
        &self,
        wav: &[u8],
        sample_rate: u32,
        locale: &str,
    ) -> Result<RecognitionResult, STTError> {
        let body = self.build_request(wav, sample_rate, locale);

        let mut request = self
            .client
            .post(self.config.recognize_url())
            .timeout(self.config.request_timeout)
            .json(&body);

        request = match &self.authorization {
            Authorization::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Authorization::Bearer(provider) => {
                let token = provider.get_token().await.map_err(google_error_to_stt)?;
                request.bearer_auth(token)
            }
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                STTError::Timeout(self.config.request_timeout)
            } else {
                google_error_to_stt(GoogleError::from(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(google_error_to_stt(GoogleError::from_http_status(
                status, &text,
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| STTError::ProviderError(format!("Malformed recognize response: {e}")))?;

        let result = parsed.into_result().ok_or(STTError::NoSpeech)?;

        debug!(
            locale = %locale,
            chars = result.transcript.chars().count(),
            confidence = ?result.confidence,
            "Google speech recognition finished"
        );

        Ok(result)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: String,
    max_alternatives: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecognizeResponse {
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpeechRecognitionResult {
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpeechRecognitionAlternative {
    transcript: String,
    confidence: Option<f32>,
}

impl RecognizeResponse {
    /// Join the top alternative of every result; confidence comes from the first
    ///
    /// `None` when the API recognized nothing.
    fn into_result(self) -> Option<RecognitionResult> {
        let top: Vec<SpeechRecognitionAlternative> = self
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .collect();

        let first_confidence = top.first()?.confidence;
        let transcript = top
            .iter()
            .map(|alt| alt.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Some(RecognitionResult::new(transcript, first_confidence))
    }
}
