use byteorder::{ByteOrder, LittleEndian};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

pub const HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
/// The header stores the channel count in 16 bits.
pub const MAX_CHANNELS: usize = u16::MAX as usize;

/// Decoded audio held as one sample vector per channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames, taken from the first channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn to_wav(&self) -> Vec<u8> {
        encode(&self.channels, self.sample_rate)
    }

    pub fn to_wav_base64(&self) -> String {
        encode_to_base64(&self.channels, self.sample_rate)
    }
}

/// Encodes per-channel samples as a 16-bit PCM WAV file with a 44-byte header.
///
/// The frame count is the length of the first channel. Shorter channels are
/// padded with silence and longer ones are cut off. Channels past
/// [`MAX_CHANNELS`] are ignored. Size fields saturate at `u32::MAX` for data
/// past the 4 GiB RIFF limit.
pub fn encode<S: AsRef<[f32]>>(channels: &[S], sample_rate: u32) -> Vec<u8> {
    let channels = &channels[..channels.len().min(MAX_CHANNELS)];
    let channel_count = channels.len();
    let frame_count = channels.first().map_or(0, |c| c.as_ref().len());
    let length = frame_count * channel_count * BYTES_PER_SAMPLE + HEADER_LEN;

    let mut buf = vec![0u8; length];
    write_header(&mut buf[..HEADER_LEN], length, channel_count, sample_rate);

    let mut offset = HEADER_LEN;
    for frame in 0..frame_count {
        for channel in channels {
            let sample = channel.as_ref().get(frame).copied().unwrap_or(0.0);
            LittleEndian::write_i16(&mut buf[offset..offset + 2], to_pcm16(sample));
            offset += BYTES_PER_SAMPLE;
        }
    }
    buf
}

/// Same as [`encode`], returned as standard base64 with no line wrapping.
pub fn encode_to_base64<S: AsRef<[f32]>>(channels: &[S], sample_rate: u32) -> String {
    BASE64_STANDARD.encode(encode(channels, sample_rate))
}

fn write_header(header: &mut [u8], length: usize, channel_count: usize, sample_rate: u32) {
    let channels = u16::try_from(channel_count).unwrap_or(u16::MAX);
    let block_align = channels.saturating_mul(BYTES_PER_SAMPLE as u16);
    let byte_rate = sample_rate.saturating_mul(u32::from(block_align));

    header[0..4].copy_from_slice(b"RIFF");
    LittleEndian::write_u32(&mut header[4..8], saturate_u32(length - 8));
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    LittleEndian::write_u32(&mut header[16..20], FMT_CHUNK_LEN);
    LittleEndian::write_u16(&mut header[20..22], FORMAT_PCM);
    LittleEndian::write_u16(&mut header[22..24], channels);
    LittleEndian::write_u32(&mut header[24..28], sample_rate);
    LittleEndian::write_u32(&mut header[28..32], byte_rate);
    LittleEndian::write_u16(&mut header[32..34], block_align);
    LittleEndian::write_u16(&mut header[34..36], BITS_PER_SAMPLE);

    header[36..40].copy_from_slice(b"data");
    LittleEndian::write_u32(&mut header[40..44], saturate_u32(length - HEADER_LEN));
}

fn saturate_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Clamps to [-1, 1] and scales asymmetrically so that -1.0 maps to -32768
/// and 1.0 to 32767. The fractional part is truncated toward zero.
fn to_pcm16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    // Scaled in f64: an f32 product can round up across an integer.
    let sample = f64::from(sample.clamp(-1.0, 1.0));
    if sample < 0.0 {
        (sample * 32768.0) as i16
    } else {
        (sample * 32767.0) as i16
    }
}
