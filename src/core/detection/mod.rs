//! AI-voice detection pipeline.
//!
//! - `quality` - clipping and SNR bucket
//! - `features` - acoustic features and the scoring rule cascade
//! - `segments` - per-second local verdicts
//! - `language` - language guessing over a transcription service
//! - `detector` - the orchestrator producing a [`DetectionResult`]
//!
//! # Example
//! ```rust,no_run
//! use voice_detection::core::audio::Waveform;
//! use voice_detection::core::detection::{LanguageGuesser, VoiceDetector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = VoiceDetector::new(LanguageGuesser::disabled());
//! let waveform = Waveform::new(vec![0.0; 16_000], 16_000)?;
//! let result = detector.detect(waveform).await?;
//! println!("{:?} ({:.2})", result.classification, result.deepfake_risk_score);
//! # Ok(())
//! # }
//! ```

mod detector;
pub mod features;
pub mod language;
pub mod quality;
pub mod segments;
pub mod types;

pub use detector::{DetectionError, VoiceDetector, confidence};
pub use features::{Explanation, FeatureSet, explain, extract_features};
pub use language::{CandidateOutcome, LanguageGuesser};
pub use quality::{assess_quality, snr_db};
pub use segments::segment;
pub use types::{Classification, DetectionResult, Language, Level, QualityReport, Segment};
