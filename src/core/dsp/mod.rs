//! Frame-based spectral and temporal primitives.
//!
//! Every analysis in the detector runs on the same framing: 2048-sample
//! frames advanced by 512 samples, centered so frame `t` covers samples
//! `t * 512 - 1024 .. t * 512 + 1024`. A signal of `n` samples therefore
//! yields `1 + n / 512` frames. All math is done in `f64`.
//!
//! The helpers are pure functions of their inputs and never panic on empty
//! or degenerate buffers; they return empty vectors or `0.0` instead.

mod spectrum;
mod stats;
mod temporal;

pub use spectrum::{PitchTrack, Stft, piptrack, rms_from_spectrogram, spectral_flatness};
pub use stats::{mean, median, percentile, std_dev};
pub use temporal::{rms_frames, split_non_silent, zero_crossing_rate};

/// Analysis frame length in samples
pub const FRAME_LENGTH: usize = 2048;

/// Distance between consecutive frame starts
pub const HOP_LENGTH: usize = 512;

/// Number of non-negative frequency bins per frame
pub const N_BINS: usize = FRAME_LENGTH / 2 + 1;

/// Power floor used before taking logarithms
pub const AMIN: f64 = 1e-10;

/// Number of centered frames produced for a signal of `len` samples
pub fn frame_count(len: usize) -> usize {
    if len == 0 { 0 } else { 1 + len / HOP_LENGTH }
}

/// How samples outside the signal are filled when a frame overhangs an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Padding {
    Zero,
    Edge,
}

/// Sample at a possibly out-of-range index of a non-empty signal
fn sample_at(samples: &[f64], index: isize, padding: Padding) -> f64 {
    if let Ok(i) = usize::try_from(index)
        && let Some(&value) = samples.get(i)
    {
        return value;
    }

    match padding {
        Padding::Zero => 0.0,
        Padding::Edge if index < 0 => samples.first().copied().unwrap_or(0.0),
        Padding::Edge => samples.last().copied().unwrap_or(0.0),
    }
}

/// Copy the centered frame `frame` into `out` (length `FRAME_LENGTH`)
pub(crate) fn fill_frame(samples: &[f64], frame: usize, padding: Padding, out: &mut [f64]) {
    let origin = (frame * HOP_LENGTH) as isize - (FRAME_LENGTH / 2) as isize;
    for (offset, slot) in out.iter_mut().enumerate() {
        *slot = sample_at(samples, origin + offset as isize, padding);
    }
}
