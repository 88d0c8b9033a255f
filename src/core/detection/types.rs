//! Result records produced by the detector.
//!
//! Field names and enum spellings are part of the public JSON contract.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Verdict for a whole recording or a single segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Classification {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
}

impl Classification {
    /// AI when the score is strictly above the 0.5 decision boundary
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            Classification::AiGenerated
        } else {
            Classification::Human
        }
    }
}

/// Three-step scale shared by confidence levels and quality buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Languages the guesser can report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Malayalam,
}

impl Language {
    /// BCP-47 locale requested from the transcription service
    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Tamil => "ta-IN",
            Language::Telugu => "te-IN",
            Language::Malayalam => "ml-IN",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Malayalam => "Malayalam",
        };
        f.write_str(name)
    }
}

/// Recording quality estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct QualityReport {
    /// Signal-to-noise ratio in dB
    pub snr: f64,
    pub clipping_detected: bool,
    #[serde(rename = "quality_check")]
    pub quality: Level,
}

impl QualityReport {
    /// Report for input too short to frame
    pub fn degenerate() -> Self {
        Self {
            snr: 0.0,
            clipping_detected: false,
            quality: Level::Low,
        }
    }
}

/// Local verdict for one fixed-length window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Segment {
    /// Window start in seconds
    pub start_time: f64,
    /// Window end in seconds
    pub end_time: f64,
    pub label: Classification,
    pub confidence: f64,
}

/// Complete answer for one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DetectionResult {
    pub classification: Classification,
    /// Distance of the score from the decision boundary, floored at 0.1
    pub confidence_score: f64,
    pub confidence_level: Level,
    /// The AI-likelihood score in [0, 1]
    pub deepfake_risk_score: f64,
    pub detected_language: Language,
    pub audio_quality: QualityReport,
    /// Reasons in the order the rules fired
    pub explainability: Vec<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_spellings() {
        assert_eq!(
            serde_json::to_value(Classification::AiGenerated).unwrap(),
            "AI_GENERATED"
        );
        assert_eq!(serde_json::to_value(Classification::Human).unwrap(), "HUMAN");
        assert_eq!(serde_json::to_value(Level::Medium).unwrap(), "MEDIUM");
        assert_eq!(serde_json::to_value(Language::Malayalam).unwrap(), "Malayalam");
    }

    #[test]
    fn test_classification_boundary() {
        assert_eq!(Classification::from_score(0.5), Classification::Human);
        assert_eq!(Classification::from_score(0.51), Classification::AiGenerated);
    }

    #[test]
    fn test_quality_report_field_names() {
        let value = serde_json::to_value(QualityReport::degenerate()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"snr": 0.0, "clipping_detected": false, "quality_check": "LOW"})
        );
    }

    #[test]
    fn test_language_locales() {
        assert_eq!(Language::English.locale(), "en-IN");
        assert_eq!(Language::Telugu.locale(), "te-IN");
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Language::Tamil.to_string(), "Tamil");
    }
}
