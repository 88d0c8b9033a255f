//! Configuration module for the voice detection server
//!
//! This module handles server configuration from various sources: YAML files and
//! environment variables. The configuration is split into logical submodules for
//! maintainability.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use voice_detection::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file, falling back to environment variables
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

/// Default listening port
pub const DEFAULT_PORT: u16 = 8000;

/// Default per-call timeout for the transcription service
pub const DEFAULT_RECOGNITION_TIMEOUT_SECONDS: u64 = 10;

/// Default timeout when fetching audio from a remote URL
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 15;

/// Default upper bound on decoded audio payload size (25 MiB)
pub const DEFAULT_MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Google Cloud Speech-to-Text REST endpoint
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://speech.googleapis.com";

/// Server configuration
///
/// Contains all configuration needed to run the server, including:
/// - Server settings (host, port)
/// - The API key callers must present
/// - Speech recognition credentials used for language guessing
/// - Input limits for inline and remote audio
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Authentication
    pub api_key: Option<String>,

    // Speech recognition (language guessing)
    pub google_api_key: Option<String>,
    pub google_credentials: Option<String>,
    pub speech_endpoint: String,
    pub recognition_timeout_seconds: u64,
    pub language_detection: bool,

    // Input limits
    pub fetch_timeout_seconds: u64,
    pub max_audio_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            google_api_key: None,
            google_credentials: None,
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            recognition_timeout_seconds: DEFAULT_RECOGNITION_TIMEOUT_SECONDS,
            language_detection: true,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable fallbacks
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // No .env loading here: the YAML file is the source of truth and only
        // real environment variables fill the gaps.
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;

        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if an API key is configured for protected routes
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.is_empty())
    }

    /// Check if a speech recognizer can be built from this configuration
    ///
    /// Returns true if language detection is enabled and either an API key or
    /// Google credentials (possibly empty, meaning ADC) are configured.
    pub fn has_speech_recognizer(&self) -> bool {
        self.language_detection
            && (self.google_api_key.is_some() || self.google_credentials.is_some())
    }

    /// Per-call timeout for the transcription service
    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_secs(self.recognition_timeout_seconds)
    }

    /// Timeout for fetching remote audio
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Maximum accepted HTTP request body size
    ///
    /// Base64 inflates the payload by 4/3, plus room for the JSON envelope
    /// and an optional data-URI header.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_audio_bytes
            .saturating_mul(4)
            .saturating_div(3)
            .saturating_add(64 * 1024)
    }
}
