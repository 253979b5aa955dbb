use crate::error::SubvoxError;
use crate::wav::AudioBuffer;

use std::io::Cursor;
use std::path::Path;

use tracing::{debug, info};

/// Turns the bytes of a media container into decoded per-channel samples.
///
/// Decoders are plain values: construct one, hand it to [`extract_audio`] and
/// drop it when done.
pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer, SubvoxError>;
}

/// Decoder for RIFF/WAVE input, integer or float PCM.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl WavDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer, SubvoxError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(decode_error)?;
        let spec = reader.spec();
        debug!(
            "WAV input: {} Hz, {} channels, {} bits",
            spec.sample_rate, spec.channels, spec.bits_per_sample
        );

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_value))
                    .collect::<Result<_, _>>()
                    .map_err(decode_error)?
            }
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(decode_error)?,
        };

        let channel_count = usize::from(spec.channels);
        if channel_count == 0 {
            return Err(SubvoxError::Decode("WAV input declares no channels".to_string()));
        }
        let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }

        Ok(AudioBuffer::new(channels, spec.sample_rate))
    }
}

fn decode_error(err: hound::Error) -> SubvoxError {
    SubvoxError::Decode(err.to_string())
}

/// Reads a media file and decodes its audio with the given decoder.
pub fn extract_audio<D: AudioDecoder + ?Sized>(
    decoder: &D,
    path: &Path,
) -> Result<AudioBuffer, SubvoxError> {
    let bytes = std::fs::read(path)?;
    let audio = decoder.decode(&bytes)?;
    info!(
        "Decoded {} ({} channels, {} Hz, {:.2} seconds)",
        path.display(),
        audio.channel_count(),
        audio.sample_rate,
        audio.duration_secs()
    );
    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav;

    fn hound_wav(spec: hound::WavSpec, samples: &[i32]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in samples {
                writer.write_sample(*s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_own_encoder_output() {
        let audio = AudioBuffer::new(vec![vec![0.5, -0.5, 0.0], vec![1.0, -1.0, 0.25]], 22050);
        let bytes = wav::encode(&audio.channels, audio.sample_rate);

        let decoded = WavDecoder::new().decode(&bytes).unwrap();

        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frame_count(), 3);
        assert_eq!(decoded.channels[1][1], -1.0);
        assert_eq!(decoded.channels[0][2], 0.0);
        assert!((decoded.channels[0][0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn normalises_eight_bit_samples() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = hound_wav(spec, &[-128, 0, 64]);

        let decoded = WavDecoder::new().decode(&bytes).unwrap();

        assert_eq!(decoded.channels, vec![vec![-1.0, 0.0, 0.5]]);
    }

    #[test]
    fn rejects_non_wav_input() {
        match WavDecoder::new().decode(b"definitely not a wav file") {
            Err(SubvoxError::Decode(_)) => (),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn extract_audio_reports_missing_file() {
        let path = Path::new("/nonexistent/subvox/input.wav");
        assert!(matches!(
            extract_audio(&WavDecoder::new(), path),
            Err(SubvoxError::Io(_))
        ));
    }
}
