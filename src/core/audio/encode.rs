use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

use super::Waveform;
use crate::errors::audio_error::AudioError;

/// Encode a waveform as an in-memory 16-bit mono PCM WAV file
///
/// Samples are clamped to [-1, 1] before scaling.
pub fn encode_wav(waveform: &Waveform) -> Result<Vec<u8>, AudioError> {
    let sample_count = wav_sample_count(waveform.len())?;

    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + waveform.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioError::Decode(format!("failed to start WAV stream: {e}")))?;

        let mut samples = writer.get_i16_writer(sample_count);
        for &sample in waveform.samples() {
            samples.write_sample((sample.clamp(-1.0, 1.0) * 32767.0) as i16);
        }
        samples
            .flush()
            .map_err(|e| AudioError::Decode(format!("failed to write WAV samples: {e}")))?;

        writer
            .finalize()
            .map_err(|e| AudioError::Decode(format!("failed to finalize WAV stream: {e}")))?;
    }

    Ok(cursor.into_inner())
}

/// WAV headers store the sample count as u32
fn wav_sample_count(len: usize) -> Result<u32, AudioError> {
    u32::try_from(len)
        .map_err(|_| AudioError::Decode(format!("{len} samples exceed the WAV sample limit")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::decode_audio;

    #[test]
    fn test_sample_count_rejects_oversized_streams() {
        assert_eq!(wav_sample_count(16_000).unwrap(), 16_000);
        assert_eq!(wav_sample_count(u32::MAX as usize).unwrap(), u32::MAX);

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            wav_sample_count(u32::MAX as usize + 1),
            Err(AudioError::Decode(msg)) if msg.contains("exceed")
        ));
    }

    #[test]
    fn test_encode_wav_header() {
        let waveform = Waveform::new(vec![0.0; 160], 16_000).unwrap();
        let bytes = encode_wav(&waveform).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + 160 * 2);
    }

    #[test]
    fn test_encode_wav_clamps_out_of_range() {
        let waveform = Waveform::new(vec![2.0, -2.0, 0.5], 8000).unwrap();
        let bytes = encode_wav(&waveform).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![32767, -32767, 16383]);
    }

    #[test]
    fn test_encode_then_decode_preserves_shape() {
        let original: Vec<f64> = (0..800).map(|n| ((n % 40) as f64 / 40.0) - 0.5).collect();
        let waveform = Waveform::new(original.clone(), 8000).unwrap();

        let decoded = decode_audio(&encode_wav(&waveform).unwrap()).unwrap();
        assert_eq!(decoded.sample_rate(), 8000);
        assert_eq!(decoded.len(), original.len());
        for (a, b) in decoded.samples().iter().zip(&original) {
            assert!((a - b).abs() < 1e-3);
        }
    }
}
