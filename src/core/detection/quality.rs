//! Clipping and SNR based recording quality.

use ndarray::Array2;

use super::types::{Level, QualityReport};
use crate::core::dsp::{mean, percentile, rms_from_spectrogram};

/// Peak amplitude above which a recording counts as clipped
const CLIPPING_THRESHOLD: f64 = 0.99;

/// Substitute for an all-zero noise floor
const NOISE_FLOOR_EPSILON: f64 = 1e-9;

/// Estimate SNR in dB from per-frame RMS energy.
///
/// The 10th percentile frame energy is taken as the noise floor and the mean
/// of the frames above it as the signal level. `None` for an empty sequence.
pub fn snr_db(frame_rms: &[f64]) -> Option<f64> {
    if frame_rms.is_empty() {
        return None;
    }

    let mut noise = percentile(frame_rms, 10.0);
    if noise == 0.0 {
        noise = NOISE_FLOOR_EPSILON;
    }

    let above: Vec<f64> = frame_rms.iter().copied().filter(|&e| e > noise).collect();
    let signal = if above.is_empty() {
        noise
    } else {
        let level = mean(&above);
        if level.is_nan() { noise } else { level }
    };

    Some(20.0 * (signal / noise).log10())
}

fn bucket(snr: f64) -> Level {
    if snr < 10.0 {
        Level::Low
    } else if snr < 30.0 {
        Level::Medium
    } else {
        Level::High
    }
}

/// Quality report for `samples` given their magnitude spectrogram
pub fn assess_quality(samples: &[f64], spectrogram: &Array2<f64>) -> QualityReport {
    let frame_rms = rms_from_spectrogram(spectrogram);
    let Some(snr) = snr_db(&frame_rms) else {
        return QualityReport::degenerate();
    };

    let peak = samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));

    QualityReport {
        snr,
        clipping_detected: peak > CLIPPING_THRESHOLD,
        quality: bucket(snr),
    }
}
