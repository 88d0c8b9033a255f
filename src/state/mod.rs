use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;

use crate::config::ServerConfig;
use crate::core::detection::{LanguageGuesser, VoiceDetector};
use crate::core::stt::create_speech_recognizer;

/// Application state that can be shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: ServerConfig,
    /// Detection pipeline, including the optional language guesser
    pub detector: VoiceDetector,
    /// Pooled client for remote audio and the transcription service
    pub http_client: Client,
}

impl AppState {
    /// Build the state from configuration
    ///
    /// A speech recognizer that fails to initialize is logged and language
    /// guessing falls back to English rather than refusing to start.
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let http_client = Client::builder()
            .pool_max_idle_per_host(10)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to create HTTP client")?;

        let recognizer = match create_speech_recognizer(&config, http_client.clone()) {
            Ok(recognizer) => recognizer,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize speech recognizer, language detection disabled");
                None
            }
        };

        let language = LanguageGuesser::new(recognizer, config.recognition_timeout());
        let detector = VoiceDetector::new(language);

        Ok(Self::with_detector(config, detector, http_client))
    }

    /// Build the state around an existing detector
    pub fn with_detector(config: ServerConfig, detector: VoiceDetector, http_client: Client) -> Arc<Self> {
        Arc::new(Self {
            config,
            detector,
            http_client,
        })
    }
}
