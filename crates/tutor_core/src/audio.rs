//! crates/tutor_core/src/audio.rs
//!
//! Wraps raw interleaved little-endian PCM in a WAV container.
//!
//! Only 8- and 16-bit mono or stereo PCM is accepted: those are the layouts that
//! get the plain 44-byte PCM header. Wider samples or more channels would need
//! `WAVE_FORMAT_EXTENSIBLE`.

use crate::media::encode_data_uri;
use base64::{engine::general_purpose::STANDARD, Engine};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Unsupported sample width of {0} bytes; expected 1 or 2.")]
    UnsupportedSampleWidth(u16),
    #[error("Unsupported channel count of {0}; expected 1 or 2.")]
    UnsupportedChannels(u16),
    #[error("Audio must have at least one channel and a non-zero sample rate.")]
    InvalidFormat,
    #[error("PCM buffer of {len} bytes is not a whole number of {frame}-byte frames.")]
    PartialFrame { len: usize, frame: usize },
    #[error("Audio payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to write WAV container: {0}")]
    Wav(#[from] hound::Error),
}

/// Layout of a raw PCM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub sample_width_bytes: u16,
}

impl PcmFormat {
    /// What the speech model emits: mono, 24 kHz, 16-bit.
    pub const SPEECH: PcmFormat = PcmFormat {
        channels: 1,
        sample_rate: 24_000,
        sample_width_bytes: 2,
    };

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width_bytes * 8
    }

    fn frame_len(&self) -> usize {
        usize::from(self.channels) * usize::from(self.sample_width_bytes)
    }

    fn spec(&self) -> Result<WavSpec, CodecError> {
        if !(1..=2).contains(&self.sample_width_bytes) {
            return Err(CodecError::UnsupportedSampleWidth(self.sample_width_bytes));
        }
        if self.channels == 0 || self.sample_rate == 0 {
            return Err(CodecError::InvalidFormat);
        }
        if self.channels > 2 {
            return Err(CodecError::UnsupportedChannels(self.channels));
        }
        Ok(WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: SampleFormat::Int,
        })
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::SPEECH
    }
}

/// Builds a complete WAV file around `pcm`: a 44-byte PCM header, then the samples.
pub fn pcm_to_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, CodecError> {
    let spec = format.spec()?;
    let frame = format.frame_len();
    if pcm.len() % frame != 0 {
        return Err(CodecError::PartialFrame {
            len: pcm.len(),
            frame,
        });
    }

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    let mut writer = WavWriter::new(&mut cursor, spec)?;

    if format.sample_width_bytes == 1 {
        // 8-bit WAV is unsigned; hound stores i8 samples offset by 128.
        for &byte in pcm {
            writer.write_sample((i16::from(byte) - 128) as i8)?;
        }
    } else {
        for chunk in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
        }
    }

    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// WAV bytes, base64 encoded.
pub fn pcm_to_wav_base64(pcm: &[u8], format: PcmFormat) -> Result<String, CodecError> {
    Ok(STANDARD.encode(pcm_to_wav(pcm, format)?))
}

/// WAV bytes as a `data:audio/wav;base64,...` URI.
pub fn pcm_to_wav_data_uri(pcm: &[u8], format: PcmFormat) -> Result<String, CodecError> {
    Ok(encode_data_uri("audio/wav", &pcm_to_wav(pcm, format)?))
}
