pub mod audio;
pub mod detection;
pub mod dsp;
pub mod providers;
pub mod stt;

// Re-export commonly used types for convenience
pub use audio::{AudioSource, Waveform};
pub use detection::{DetectionResult, LanguageGuesser, VoiceDetector};
pub use stt::{STTError, SpeechRecognizer, create_speech_recognizer};
