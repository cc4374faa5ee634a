// src/audio/mod.rs
//! Audio module - PCM decoding, playback transport, progress and waveform.

pub mod output;
pub mod pcm;
pub mod position;
pub mod progress;
pub mod transport;
pub mod waveform;

// Re-export commonly used types
pub use output::{AudioOutput, PlaybackError, PlaybackHandle, RodioOutput};
pub use pcm::{decode_base64_pcm, AudioBuffer, DecodeError};
pub use position::PlaybackPosition;
pub use progress::{Progress, ProgressTracker};
pub use transport::{Applied, GenerationTicket, PlayOutcome, Transport, TransportState};
pub use waveform::{Waveform, WaveformStyle};
