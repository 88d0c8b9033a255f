use std::sync::Arc;

use tracing::{debug, info};

use super::features::{Explanation, explain, extract_features};
use super::language::LanguageGuesser;
use super::quality::assess_quality;
use super::segments::segment;
use super::types::{Classification, DetectionResult, Language, Level, QualityReport, Segment};
use crate::core::audio::Waveform;
use crate::core::dsp::Stft;

/// Errors from running the detection pipeline
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Whole-recording analysis that shares one spectrogram
#[derive(Debug, Clone, PartialEq)]
struct Analysis {
    quality: QualityReport,
    explanation: Explanation,
}

fn analyze(stft: &Stft, waveform: &Waveform) -> Analysis {
    let samples = waveform.samples();
    let spectrogram = stft.magnitude(samples);

    let quality = assess_quality(samples, &spectrogram);
    let features = extract_features(samples, waveform.sample_rate(), &spectrogram);
    debug!(?features, "Features extracted");

    Analysis {
        quality,
        explanation: explain(&features),
    }
}

/// Distance of `score` from 0.5, doubled and floored at 0.1, with its level
pub fn confidence(score: f64) -> (f64, Level) {
    let raw = ((score - 0.5).abs() * 2.0).max(0.1);
    let level = if raw > 0.8 {
        Level::High
    } else if raw > 0.4 {
        Level::Medium
    } else {
        Level::Low
    };
    (raw, level)
}

fn assemble(analysis: Analysis, language: Language, segments: Vec<Segment>) -> DetectionResult {
    let score = analysis.explanation.score;
    let (confidence_score, confidence_level) = confidence(score);

    DetectionResult {
        classification: Classification::from_score(score),
        confidence_score,
        confidence_level,
        deepfake_risk_score: score,
        detected_language: language,
        audio_quality: analysis.quality,
        explainability: analysis.explanation.reasons,
        segments,
    }
}

/// Runs quality, features, language and segments for one recording.
///
/// CPU-bound stages run on the blocking pool. Dropping the returned future
/// cancels any language calls still in flight.
#[derive(Clone, Debug)]
pub struct VoiceDetector {
    stft: Arc<Stft>,
    language: LanguageGuesser,
}

impl VoiceDetector {
    pub fn new(language: LanguageGuesser) -> Self {
        Self {
            stft: Arc::new(Stft::new()),
            language,
        }
    }

    pub async fn detect(&self, waveform: Waveform) -> Result<DetectionResult, DetectionError> {
        let waveform = Arc::new(waveform);

        let analysis = {
            let stft = self.stft.clone();
            let waveform = waveform.clone();
            tokio::task::spawn_blocking(move || analyze(&stft, &waveform)).await?
        };
        let score = analysis.explanation.score;

        let language = self.language.guess(&waveform).await;

        let segments = {
            let stft = self.stft.clone();
            let waveform = waveform.clone();
            tokio::task::spawn_blocking(move || {
                segment(&stft, waveform.samples(), waveform.sample_rate(), score)
            })
            .await?
        };

        let result = assemble(analysis, language, segments);
        info!(
            duration_seconds = waveform.duration_seconds(),
            score = result.deepfake_risk_score,
            classification = ?result.classification,
            language = %result.detected_language,
            segments = result.segments.len(),
            "Detection finished"
        );

        Ok(result)
    }
}
