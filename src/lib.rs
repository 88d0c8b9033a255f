pub mod config;
pub mod core;
pub mod docs;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use crate::core::{
    AudioSource, DetectionResult, LanguageGuesser, STTError, SpeechRecognizer, VoiceDetector,
    Waveform, create_speech_recognizer,
};
pub use errors::app_error::{AppError, AppResult};
pub use errors::audio_error::AudioError;
pub use errors::auth_error::{AuthError, AuthResult};
pub use state::AppState;
