//! Audio acquisition: turning caller input into a mono waveform and back.
//!
//! - `decode` - base64 payloads and container decoding via symphonia
//! - `encode` - in-memory 16-bit WAV for the transcription service
//! - `source` - the tagged request input and remote fetching

mod decode;
mod encode;
mod source;

pub use decode::{decode_audio, decode_base64};
pub use encode::encode_wav;
pub use source::{AudioSource, fetch_remote};

use crate::errors::audio_error::AudioError;

/// Mono audio at its native sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Waveform {
    /// Build a waveform, rejecting empty buffers and a zero sample rate
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, AudioError> {
        if samples.is_empty() {
            return Err(AudioError::EmptyPayload);
        }
        if sample_rate == 0 {
            return Err(AudioError::Decode("sample rate is zero".to_string()));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Average interleaved channels into a mono waveform
    pub fn from_interleaved(
        interleaved: &[f64],
        channels: usize,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::Decode("stream has no channels".to_string()));
        }
        let samples = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect();
        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}
