//! Acoustic features and the rule cascade that turns them into a score.
//!
//! Each rule is a pure function of the [`FeatureSet`] returning an optional
//! [`Finding`]. Findings are folded in a fixed order into a running score that
//! never drops below zero; the final score is capped at 1.0.

use ndarray::Array2;
use tracing::debug;

use super::quality::snr_db;
use crate::core::dsp::{
    mean, piptrack, rms_from_spectrogram, spectral_flatness, split_non_silent, std_dev,
    zero_crossing_rate,
};

/// Frames quieter than this many dB below the peak count as silence
const SILENCE_TOP_DB: f64 = 20.0;

pub const REASON_FLATNESS: &str = "Abnormally high spectral flatness (robotic characteristics).";
pub const REASON_MONOTONE: &str = "Unnatural pitch stability (monotone synthesis detected).";
pub const REASON_ERRATIC: &str = "Erratic pitch variance inconsistent with natural speech.";
pub const REASON_SILENCE: &str = "Excessive silence detected.";
pub const REASON_MUFFLED: &str = "Low frequency variation (muffled/filtered signal).";
pub const REASON_STUDIO: &str = "High-fidelity studio quality detected (common in AI).";
pub const REASON_NATURAL: &str = "Natural prosody and spectral characteristics observed.";

/// Scalar features measured once per recording
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureSet {
    /// Mean spectral flatness across frames
    pub flatness: f64,
    /// Standard deviation (Hz) of salient pitch estimates
    pub pitch_std: f64,
    /// Mean zero-crossing rate across frames
    pub zcr: f64,
    /// Fraction of the recording outside non-silent intervals
    pub silence_ratio: f64,
    /// SNR in dB, 0.0 when it cannot be estimated
    pub local_snr: f64,
}

/// Measure every feature of `samples`.
///
/// `spectrogram` must be the magnitude STFT of the same samples.
pub fn extract_features(samples: &[f64], sample_rate: u32, spectrogram: &Array2<f64>) -> FeatureSet {
    let flatness = mean(&spectral_flatness(spectrogram));
    let pitch_std = std_dev(&piptrack(spectrogram, sample_rate).salient_pitches());
    let zcr = mean(&zero_crossing_rate(samples));

    let silence_ratio = if samples.is_empty() {
        0.0
    } else {
        let voiced: usize = split_non_silent(samples, SILENCE_TOP_DB)
            .iter()
            .map(|(start, end)| end - start)
            .sum();
        1.0 - voiced as f64 / samples.len() as f64
    };

    let local_snr = snr_db(&rms_from_spectrogram(spectrogram)).unwrap_or(0.0);

    FeatureSet {
        flatness,
        pitch_std,
        zcr,
        silence_ratio,
        local_snr,
    }
}

/// Outcome of one rule: a score change and an optional reason
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finding {
    pub delta: f64,
    pub reason: Option<&'static str>,
}

impl Finding {
    fn new(delta: f64, reason: &'static str) -> Self {
        Self {
            delta,
            reason: Some(reason),
        }
    }
}

type Rule = fn(&FeatureSet) -> Option<Finding>;

fn flat_spectrum(f: &FeatureSet) -> Option<Finding> {
    (f.flatness > 0.2).then(|| Finding::new(0.4, REASON_FLATNESS))
}

fn pitch_variability(f: &FeatureSet) -> Option<Finding> {
    if f.pitch_std < 20.0 {
        Some(Finding::new(0.3, REASON_MONOTONE))
    } else if f.pitch_std > 500.0 {
        Some(Finding::new(0.2, REASON_ERRATIC))
    } else {
        None
    }
}

fn excessive_silence(f: &FeatureSet) -> Option<Finding> {
    (f.silence_ratio > 0.8).then(|| Finding::new(-0.2, REASON_SILENCE))
}

fn muffled_signal(f: &FeatureSet) -> Option<Finding> {
    (f.zcr < 0.02).then(|| Finding::new(0.0, REASON_MUFFLED))
}

/// Only weighs in on erratic pitch, where clean audio points to synthesis
fn studio_quality(f: &FeatureSet) -> Option<Finding> {
    if f.pitch_std <= 500.0 {
        return None;
    }
    if f.local_snr > 38.0 {
        Some(Finding::new(0.5, REASON_STUDIO))
    } else if f.local_snr > 30.0 {
        Some(Finding {
            delta: 0.3,
            reason: None,
        })
    } else {
        None
    }
}

/// Rules in application order
const RULES: [(&str, Rule); 5] = [
    ("flat_spectrum", flat_spectrum),
    ("pitch_variability", pitch_variability),
    ("excessive_silence", excessive_silence),
    ("muffled_signal", muffled_signal),
    ("studio_quality", studio_quality),
];

/// Ordered reasons and the AI-likelihood score in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub reasons: Vec<String>,
    pub score: f64,
}

/// Fold the rule cascade over `features`.
///
/// When no rule raised the score the recording is described as natural.
/// This keys on whether a rule added to the score, not on the final score
/// being zero: erratic pitch cancelled by excessive silence ends at 0.0 but
/// keeps only its own reasons.
pub fn explain(features: &FeatureSet) -> Explanation {
    let mut reasons = Vec::new();
    let mut score = 0.0f64;
    let mut raised = false;

    for (name, rule) in RULES {
        let Some(finding) = rule(features) else {
            continue;
        };
        debug!(rule = name, delta = finding.delta, "Rule fired");

        score = (score + finding.delta).max(0.0);
        raised |= finding.delta > 0.0;
        if let Some(reason) = finding.reason {
            reasons.push(reason.to_string());
        }
    }

    if !raised {
        reasons.push(REASON_NATURAL.to_string());
    }

    Explanation {
        reasons,
        score: score.min(1.0),
    }
}
