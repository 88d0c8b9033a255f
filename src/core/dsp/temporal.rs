//! Time-domain frame measures.

use super::{AMIN, FRAME_LENGTH, HOP_LENGTH, Padding, fill_frame, frame_count};

/// Magnitudes at or below this are treated as exact zeros when counting crossings
const ZERO_CROSSING_THRESHOLD: f64 = 1e-10;

/// Per-frame RMS computed directly from the samples (centered, zero padded)
pub fn rms_frames(samples: &[f64]) -> Vec<f64> {
    let mut frame = vec![0.0f64; FRAME_LENGTH];

    (0..frame_count(samples.len()))
        .map(|t| {
            fill_frame(samples, t, Padding::Zero, &mut frame);
            let power = frame.iter().map(|v| v * v).sum::<f64>() / FRAME_LENGTH as f64;
            power.sqrt()
        })
        .collect()
}

/// Per-frame zero-crossing rate (centered, edge padded)
///
/// A crossing is a change of sign bit between neighbouring samples; tiny
/// values count as positive zero. The rate divides by the frame length.
pub fn zero_crossing_rate(samples: &[f64]) -> Vec<f64> {
    let mut frame = vec![0.0f64; FRAME_LENGTH];

    (0..frame_count(samples.len()))
        .map(|t| {
            fill_frame(samples, t, Padding::Edge, &mut frame);

            let negative = |v: f64| v.abs() > ZERO_CROSSING_THRESHOLD && v.is_sign_negative();
            let crossings = frame
                .windows(2)
                .filter(|pair| negative(pair[0]) != negative(pair[1]))
                .count();

            crossings as f64 / FRAME_LENGTH as f64
        })
        .collect()
}

/// Non-silent intervals as `(start, end)` sample ranges
///
/// A frame is non-silent when its power is within `top_db` of the loudest
/// frame. Runs of non-silent frames become intervals, converted back to
/// samples and clipped to the signal length. A signal with no energy at all
/// is a single non-silent interval.
pub fn split_non_silent(samples: &[f64], top_db: f64) -> Vec<(usize, usize)> {
    let power: Vec<f64> = rms_frames(samples).iter().map(|v| v * v).collect();
    if power.is_empty() {
        return Vec::new();
    }

    let peak = power.iter().copied().fold(0.0f64, f64::max);
    let reference_db = 10.0 * peak.max(AMIN).log10();
    let loud: Vec<bool> = power
        .iter()
        .map(|&p| 10.0 * p.max(AMIN).log10() - reference_db > -top_db)
        .collect();

    let mut edges = Vec::new();
    if loud[0] {
        edges.push(0);
    }
    edges.extend(
        loud.windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(i, _)| i + 1),
    );
    if loud[loud.len() - 1] {
        edges.push(loud.len());
    }

    edges
        .chunks_exact(2)
        .map(|pair| {
            let start = (pair[0] * HOP_LENGTH).min(samples.len());
            let end = (pair[1] * HOP_LENGTH).min(samples.len());
            (start, end)
        })
        .collect()
}
