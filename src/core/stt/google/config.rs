use std::time::Duration;

/// How requests to the Speech-to-Text REST API are authorized.
#[derive(Debug, Clone, PartialEq)]
pub enum GoogleSpeechAuth {
    /// Plain API key, sent as the `key` query parameter
    ApiKey(String),
    /// OAuth2 credentials setting: empty for ADC, inline JSON, or a file path
    Credentials(String),
}

/// Configuration for the Google Cloud Speech-to-Text v1 REST recognizer.
#[derive(Debug, Clone)]
pub struct GoogleSpeechConfig {
    /// Base URL, e.g. `https://speech.googleapis.com`
    pub endpoint: String,
    pub auth: GoogleSpeechAuth,
    /// Upper bound for a single HTTP round trip
    pub request_timeout: Duration,
    /// Recognition model; `None` lets the API pick its default
    pub model: Option<String>,
}

impl GoogleSpeechConfig {
    pub fn new(endpoint: impl Into<String>, auth: GoogleSpeechAuth) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth,
            request_timeout: Duration::from_secs(10),
            model: None,
        }
    }

    /// Full URL of the synchronous `speech:recognize` method
    pub fn recognize_url(&self) -> String {
        format!("{}/v1/speech:recognize", self.endpoint.trim_end_matches('/'))
    }
}
