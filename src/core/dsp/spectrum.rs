//! Short-time Fourier transform and the measures derived from it.

use ndarray::{Array2, ArrayView1, Axis};
use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::sync::Arc;

use super::{AMIN, FRAME_LENGTH, N_BINS, Padding, fill_frame, frame_count, median};

/// Lowest frequency considered by the pitch tracker (Hz)
const PITCH_FMIN: f64 = 150.0;

/// Highest frequency considered by the pitch tracker (Hz), capped at Nyquist
const PITCH_FMAX: f64 = 4000.0;

/// Fraction of the per-frame peak a bin must exceed to be a pitch candidate
const PITCH_THRESHOLD: f64 = 0.1;

/// Magnitude STFT with a periodic Hann window.
///
/// Holds the FFT plan so a single instance can be reused across calls.
pub struct Stft {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft")
            .field("frame_length", &FRAME_LENGTH)
            .finish_non_exhaustive()
    }
}

impl Default for Stft {
    fn default() -> Self {
        Self::new()
    }
}

impl Stft {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FRAME_LENGTH);

        Self {
            fft,
            window: Self::hann_window(),
        }
    }

    /// Periodic Hann window (denominator `N`, not `N - 1`)
    fn hann_window() -> Vec<f64> {
        (0..FRAME_LENGTH)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / FRAME_LENGTH as f64).cos())
            .collect()
    }

    /// Magnitude spectrogram with shape `(N_BINS, frames)`
    ///
    /// Frames are centered and zero padded at both ends of the signal.
    pub fn magnitude(&self, samples: &[f64]) -> Array2<f64> {
        let n_frames = frame_count(samples.len());
        let mut magnitudes = Array2::<f64>::zeros((N_BINS, n_frames));
        if n_frames == 0 {
            return magnitudes;
        }

        let mut frame = vec![0.0f64; FRAME_LENGTH];
        let mut buffer = vec![Complex::new(0.0f64, 0.0f64); FRAME_LENGTH];
        let mut scratch = vec![Complex::new(0.0f64, 0.0f64); self.fft.get_inplace_scratch_len()];

        for t in 0..n_frames {
            fill_frame(samples, t, Padding::Zero, &mut frame);

            for ((slot, &sample), &w) in buffer.iter_mut().zip(&frame).zip(&self.window) {
                *slot = Complex::new(sample * w, 0.0);
            }

            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            for (bin, value) in buffer.iter().take(N_BINS).enumerate() {
                magnitudes[[bin, t]] = value.norm();
            }
        }

        magnitudes
    }
}

/// Per-frame root-mean-square energy from a magnitude spectrogram
///
/// The DC and Nyquist bins count half, matching the energy of the windowed
/// frame spread over the full two-sided spectrum.
pub fn rms_from_spectrogram(spectrogram: &Array2<f64>) -> Vec<f64> {
    let last = spectrogram.nrows().saturating_sub(1);
    let scale = (FRAME_LENGTH * FRAME_LENGTH) as f64;

    spectrogram
        .axis_iter(Axis(1))
        .map(|column| {
            let energy: f64 = column
                .iter()
                .enumerate()
                .map(|(bin, &m)| {
                    let power = m * m;
                    if bin == 0 || bin == last {
                        power * 0.5
                    } else {
                        power
                    }
                })
                .sum();
            (2.0 * energy / scale).sqrt()
        })
        .collect()
}

/// Per-frame spectral flatness of the power spectrum
///
/// Geometric mean over arithmetic mean, with powers floored at `AMIN`. A
/// silent frame is perfectly flat (1.0).
pub fn spectral_flatness(spectrogram: &Array2<f64>) -> Vec<f64> {
    spectrogram
        .axis_iter(Axis(1))
        .map(|column| {
            let n = column.len() as f64;
            let (log_sum, sum) = column.iter().fold((0.0f64, 0.0f64), |(ls, s), &m| {
                let power = (m * m).max(AMIN);
                (ls + power.ln(), s + power)
            });
            (log_sum / n).exp() / (sum / n)
        })
        .collect()
}

/// Output of [`piptrack`]: instantaneous pitch and its salience per bin
#[derive(Debug, Clone)]
pub struct PitchTrack {
    /// Interpolated frequency (Hz) at each local spectral peak, 0 elsewhere
    pub pitches: Array2<f64>,
    /// Interpolated peak magnitude at the same positions, 0 elsewhere
    pub magnitudes: Array2<f64>,
}

impl PitchTrack {
    /// Pitches whose magnitude exceeds the median magnitude of the whole track
    pub fn salient_pitches(&self) -> Vec<f64> {
        let all: Vec<f64> = self.magnitudes.iter().copied().collect();
        let threshold = median(&all);

        self.pitches
            .iter()
            .zip(self.magnitudes.iter())
            .filter(|&(_, &mag)| mag > threshold)
            .map(|(&pitch, _)| pitch)
            .collect()
    }
}

/// Parabolically interpolated spectral peak tracking
///
/// For each frame, bins between 150 Hz and `min(4000, sr / 2)` that are local
/// maxima after discarding everything at or below a tenth of the frame peak
/// are reported with their interpolated frequency and magnitude.
pub fn piptrack(spectrogram: &Array2<f64>, sample_rate: u32) -> PitchTrack {
    let (n_bins, n_frames) = spectrogram.dim();
    let mut pitches = Array2::<f64>::zeros((n_bins, n_frames));
    let mut magnitudes = Array2::<f64>::zeros((n_bins, n_frames));

    if n_bins < 3 {
        return PitchTrack {
            pitches,
            magnitudes,
        };
    }

    let sr = f64::from(sample_rate);
    let fmax = PITCH_FMAX.min(sr / 2.0);
    let bin_hz = sr / FRAME_LENGTH as f64;
    let in_band = |bin: usize| {
        let freq = bin as f64 * bin_hz;
        freq >= PITCH_FMIN && freq < fmax
    };

    for (t, column) in spectrogram.axis_iter(Axis(1)).enumerate() {
        let reference = PITCH_THRESHOLD * column.iter().copied().fold(0.0f64, f64::max);
        let gated = |bin: usize| {
            let m = column[bin];
            if m > reference { m } else { 0.0 }
        };

        for bin in 1..n_bins {
            if !in_band(bin) {
                continue;
            }

            let here = gated(bin);
            let below = gated(bin - 1);
            let above = if bin + 1 < n_bins { gated(bin + 1) } else { here };
            if !(here > below && here >= above) {
                continue;
            }

            let (shift, skew) = interpolate_peak(column, bin);
            pitches[[bin, t]] = (bin as f64 + shift) * sr / FRAME_LENGTH as f64;
            magnitudes[[bin, t]] = column[bin] + skew;
        }
    }

    PitchTrack {
        pitches,
        magnitudes,
    }
}

/// Parabolic offset of a peak from its bin centre, and the magnitude correction
///
/// Both are zero at the first and last bins.
fn interpolate_peak(column: ArrayView1<'_, f64>, bin: usize) -> (f64, f64) {
    if bin == 0 || bin + 1 >= column.len() {
        return (0.0, 0.0);
    }

    let (prev, here, next) = (column[bin - 1], column[bin], column[bin + 1]);
    let avg = 0.5 * (next - prev);
    let curvature = 2.0 * here - next - prev;
    let guard = if curvature.abs() < f64::MIN_POSITIVE { 1.0 } else { 0.0 };
    let shift = avg / (curvature + guard);

    (shift, 0.5 * avg * shift)
}
