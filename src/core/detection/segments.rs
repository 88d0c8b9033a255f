//! Per-second re-scoring of a recording.

use super::types::{Classification, Segment};
use crate::core::dsp::{Stft, mean, spectral_flatness};

/// Windows shorter than this are dropped
const MIN_WINDOW_SAMPLES: usize = 512;

/// Flatness above which a window is pushed towards AI
const WINDOW_FLATNESS_THRESHOLD: f64 = 0.3;

const WINDOW_FLATNESS_BOOST: f64 = 0.2;

/// Split `samples` into one-second windows scored from `global_score`.
///
/// The trailing partial window is kept when it has at least 512 samples.
/// Windows are scored independently, so neighbours may disagree.
pub fn segment(stft: &Stft, samples: &[f64], sample_rate: u32, global_score: f64) -> Vec<Segment> {
    let window = sample_rate as usize;
    if window == 0 {
        return Vec::new();
    }

    let full_windows = samples.len() / window;
    let rate = f64::from(sample_rate);

    (0..=full_windows)
        .filter_map(|i| {
            let start = i * window;
            let end = ((i + 1) * window).min(samples.len());
            if end.saturating_sub(start) < MIN_WINDOW_SAMPLES {
                return None;
            }

            let chunk = &samples[start..end];
            let flatness = mean(&spectral_flatness(&stft.magnitude(chunk)));

            let boost = if flatness > WINDOW_FLATNESS_THRESHOLD {
                WINDOW_FLATNESS_BOOST
            } else {
                0.0
            };
            let local_score = (global_score + boost).min(1.0);

            let label = Classification::from_score(local_score);
            let confidence = match label {
                Classification::AiGenerated => local_score,
                Classification::Human => 1.0 - local_score,
            };

            Some(Segment {
                start_time: i as f64,
                end_time: i as f64 + chunk.len() as f64 / rate,
                label,
                confidence,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(len: usize, sr: u32) -> Vec<f64> {
        (0..len)
            .map(|n| 0.5 * (2.0 * PI * 440.0 * n as f64 / f64::from(sr)).sin())
            .collect()
    }

    /// Deterministic pseudo-random noise in [-0.5, 0.5)
    fn noise(len: usize) -> Vec<f64> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
            })
            .collect()
    }

    #[test]
    fn test_two_and_a_half_seconds_gives_three_segments() {
        let stft = Stft::new();
        for sr in [8_000u32, 16_000, 22_050] {
            let samples = sine(sr as usize * 5 / 2, sr);
            let segments = segment(&stft, &samples, sr, 0.3);

            assert_eq!(segments.len(), 3, "sample rate {sr}");
            for s in &segments {
                assert!(s.end_time > s.start_time);
                assert!((0.0..=1.0).contains(&s.confidence));
            }
            assert_eq!(segments[0].start_time, 0.0);
            assert_eq!(segments[1].end_time, 2.0);
            assert!((segments[2].end_time - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_tail_is_dropped() {
        let sr = 16_000u32;
        let samples = sine(sr as usize + 511, sr);
        let segments = segment(&Stft::new(), &samples, sr, 0.0);
        assert_eq!(segments.len(), 1);

        let samples = sine(sr as usize + 512, sr);
        assert_eq!(segment(&Stft::new(), &samples, sr, 0.0).len(), 2);
    }

    #[test]
    fn test_tonal_window_inherits_global_score() {
        let sr = 16_000u32;
        let samples = sine(sr as usize, sr);

        let segments = segment(&Stft::new(), &samples, sr, 0.3);
        assert_eq!(segments[0].label, Classification::Human);
        assert!((segments[0].confidence - 0.7).abs() < 1e-12);

        let segments = segment(&Stft::new(), &samples, sr, 0.8);
        assert_eq!(segments[0].label, Classification::AiGenerated);
        assert!((segments[0].confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_window_is_boosted_and_capped() {
        let sr = 16_000u32;
        let samples = noise(sr as usize);

        let segments = segment(&Stft::new(), &samples, sr, 0.4);
        assert_eq!(segments[0].label, Classification::AiGenerated);
        assert!((segments[0].confidence - 0.6).abs() < 1e-12);

        let segments = segment(&Stft::new(), &samples, sr, 0.95);
        assert_eq!(segments[0].confidence, 1.0);
    }

    #[test]
    fn test_tiny_input_has_no_segments() {
        assert!(segment(&Stft::new(), &[0.1; 100], 16_000, 0.5).is_empty());
    }
}
