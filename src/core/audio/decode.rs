use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::Waveform;
use crate::errors::audio_error::AudioError;

/// Decode a base64 payload, accepting an optional data-URI header
///
/// Everything up to and including the first `,` is dropped, as is any ASCII
/// whitespace (line-wrapped payloads are common).
pub fn decode_base64(input: &str) -> Result<Vec<u8>, AudioError> {
    let payload = match input.split_once(',') {
        Some((_, rest)) => rest,
        None => input,
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| AudioError::InvalidBase64(e.to_string()))
}

/// Decode an audio container into a mono waveform
///
/// The container is sniffed from its header. Multi-channel audio is averaged
/// to mono. Samples keep their native rate and the decoder's [-1, 1] scale.
pub fn decode_audio(bytes: &[u8]) -> Result<Waveform, AudioError> {
    if bytes.is_empty() {
        return Err(AudioError::EmptyPayload);
    }

    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
            other => AudioError::Decode(other.to_string()),
        })?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::Decode("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
            other => AudioError::Decode(other.to_string()),
        })?;

    let mut interleaved: Vec<f64> = Vec::new();
    let mut channels = 0usize;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut buffer_frames = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt packets are skipped, the rest of the stream may be fine
            Err(SymphoniaError::DecodeError(reason)) => {
                tracing::debug!("Skipping undecodable packet: {}", reason);
                continue;
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let frames = decoded.capacity();
        if sample_buf.is_none() || frames > buffer_frames {
            sample_buf = Some(SampleBuffer::new(frames as u64, spec));
            buffer_frames = frames;
        }

        if let Some(buf) = sample_buf.as_mut() {
            channels = spec.channels.count();
            buf.copy_interleaved_ref(decoded);
            interleaved.extend(buf.samples().iter().map(|&s| f64::from(s)));
        }
    }

    if interleaved.is_empty() {
        return Err(AudioError::Decode("no samples decoded".to_string()));
    }

    tracing::debug!(
        sample_rate,
        channels,
        frames = interleaved.len() / channels.max(1),
        "Decoded audio payload"
    );

    Waveform::from_interleaved(&interleaved, channels, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn wav_bytes(channels: u16, sample_rate: u32, frames: &[Vec<i16>]) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for frame in frames {
                for &sample in frame {
                    writer.write_sample(sample).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_base64_plain_and_data_uri() {
        let payload = b"\x00\x01\xfe\xffRIFF";
        let encoded = BASE64.encode(payload);

        assert_eq!(decode_base64(&encoded).unwrap(), payload);
        assert_eq!(
            decode_base64(&format!("data:audio/wav;base64,{encoded}")).unwrap(),
            payload
        );
    }

    #[test]
    fn test_decode_base64_ignores_line_breaks() {
        let payload: Vec<u8> = (0..=255).collect();
        let encoded = BASE64.encode(&payload);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");

        assert_eq!(decode_base64(&wrapped).unwrap(), payload);
    }

    #[test]
    fn test_decode_base64_invalid() {
        assert!(matches!(
            decode_base64("not*base64!"),
            Err(AudioError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_decode_base64_empty_is_empty() {
        assert!(decode_base64("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_audio_empty() {
        assert!(matches!(decode_audio(&[]), Err(AudioError::EmptyPayload)));
    }

    #[test]
    fn test_decode_audio_garbage() {
        let result = decode_audio(b"definitely not an audio container");
        assert!(matches!(
            result,
            Err(AudioError::UnsupportedFormat(_)) | Err(AudioError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_audio_mono_wav() {
        let frames: Vec<Vec<i16>> = vec![vec![0], vec![16384], vec![-16384], vec![32767]];
        let bytes = wav_bytes(1, 22_050, &frames);

        let waveform = decode_audio(&bytes).unwrap();
        assert_eq!(waveform.sample_rate(), 22_050);
        assert_eq!(waveform.len(), 4);
        assert!((waveform.samples()[1] - 0.5).abs() < 1e-4);
        assert!((waveform.samples()[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_decode_audio_stereo_is_averaged() {
        let frames: Vec<Vec<i16>> = (0..1000).map(|_| vec![16384, 0]).collect();
        let bytes = wav_bytes(2, 16_000, &frames);

        let waveform = decode_audio(&bytes).unwrap();
        assert_eq!(waveform.len(), 1000);
        assert!(waveform.samples().iter().all(|&s| (s - 0.25).abs() < 1e-4));
    }
}
