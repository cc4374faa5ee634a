// src/audio/pcm.rs
//! Raw 16-bit PCM decoding into a playable, immutable audio buffer.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Sample rate the speech service returns.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
/// Speech audio is mono.
pub const DEFAULT_CHANNELS: u16 = 1;

/// Why a synthesized payload could not be turned into audio.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("audio payload is empty")]
    Empty,
    #[error("audio payload is not valid base64: {0}")]
    Base64(String),
    #[error("audio payload holds no complete frame ({bytes} bytes, {channels} channels)")]
    NoFrames { bytes: usize, channels: u16 },
    #[error("invalid audio format: {0}")]
    Format(&'static str),
}

/// Decoded audio, one `f32` vector per channel, never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build a buffer from de-interleaved channel data. All channels must
    /// have the same length.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, DecodeError> {
        if sample_rate == 0 {
            return Err(DecodeError::Format("sample rate must be positive"));
        }
        let Some(first) = channels.first() else {
            return Err(DecodeError::Format("at least one channel is required"));
        };
        if channels.iter().any(|c| c.len() != first.len()) {
            return Err(DecodeError::Format("channels differ in length"));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel, or `None` if `index` is out of range.
    pub fn channel_data(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Average of all channels, used for drawing.
    pub fn mono_mix(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let n = self.channels.len() as f32;
        (0..self.frame_count())
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() / n)
            .collect()
    }

    /// Interleaved samples from `offset_secs` to the end, in the layout
    /// output devices expect.
    pub fn interleaved_from(&self, offset_secs: f64) -> Vec<f32> {
        let start = ((offset_secs.max(0.0) * self.sample_rate as f64) as usize).min(self.frame_count());
        let mut out = Vec::with_capacity((self.frame_count() - start) * self.channels.len());
        for frame in start..self.frame_count() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

/// Decode base64 raw little-endian signed 16-bit PCM.
///
/// Samples are normalized with `s / 32768.0`, which maps the full `i16`
/// range onto `[-1.0, 1.0)`. An incomplete trailing frame is dropped.
pub fn decode_base64_pcm(payload: &str, sample_rate: u32, channels: u16) -> Result<AudioBuffer, DecodeError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    decode_pcm_bytes(&bytes, sample_rate, channels)
}

/// Decode already-binary PCM bytes; see [`decode_base64_pcm`].
pub fn decode_pcm_bytes(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<AudioBuffer, DecodeError> {
    if channels == 0 {
        return Err(DecodeError::Format("channel count must be positive"));
    }
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let num_channels = channels as usize;
    let total_samples = bytes.len() / 2;
    let frame_count = total_samples / num_channels;
    if frame_count == 0 {
        return Err(DecodeError::NoFrames {
            bytes: bytes.len(),
            channels,
        });
    }

    let mut data = vec![Vec::with_capacity(frame_count); num_channels];
    for frame in bytes.chunks_exact(2 * num_channels).take(frame_count) {
        for (channel, sample) in frame.chunks_exact(2).enumerate() {
            let s = i16::from_le_bytes([sample[0], sample[1]]);
            data[channel].push(s as f32 / 32768.0);
        }
    }

    AudioBuffer::from_channels(sample_rate, data)
}
