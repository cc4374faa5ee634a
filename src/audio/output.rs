// src/audio/output.rs
//! Host audio output: single-use playback handles and the host clock.

use std::sync::Arc;
use std::time::Instant;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

use super::pcm::AudioBuffer;
use super::position::effective_rate;

/// Failures reported by the host audio output.
///
/// The transport logs these and carries on; none of them may corrupt its
/// state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("playback handle was already started")]
    HandleSpent,
    #[error("playback handle was already stopped")]
    AlreadyStopped,
    #[error("audio sink error: {0}")]
    Sink(String),
}

/// One-shot playback of a buffer. Once stopped it cannot be restarted; a new
/// handle is created to resume or jump elsewhere.
pub trait PlaybackHandle {
    /// Begin producing sound `offset` seconds into the buffer.
    fn start(&mut self, offset: f64) -> Result<(), PlaybackError>;
    fn stop(&mut self) -> Result<(), PlaybackError>;
    /// Change the speed multiplier without restarting.
    fn set_rate(&mut self, rate: f32) -> Result<(), PlaybackError>;
    /// Change the pitch offset (cents) without restarting.
    fn set_detune(&mut self, cents: f32) -> Result<(), PlaybackError>;
}

/// Factory for playback handles plus the clock they run against.
pub trait AudioOutput {
    type Handle: PlaybackHandle;

    /// Host clock in seconds. Monotonic.
    fn now(&self) -> f64;

    fn create_handle(&mut self, buffer: Arc<AudioBuffer>) -> Result<Self::Handle, PlaybackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Fresh,
    Started,
    Stopped,
}

/// Playback handle backed by its own rodio `Sink`.
pub struct RodioHandle {
    sink: Sink,
    buffer: Arc<AudioBuffer>,
    speed: f32,
    detune: f32,
    state: HandleState,
}

impl RodioHandle {
    fn apply_speed(&self) {
        self.sink.set_speed(effective_rate(self.speed, self.detune) as f32);
    }
}

impl PlaybackHandle for RodioHandle {
    fn start(&mut self, offset: f64) -> Result<(), PlaybackError> {
        if self.state != HandleState::Fresh {
            return Err(PlaybackError::HandleSpent);
        }
        let samples = self.buffer.interleaved_from(offset);
        self.sink.append(SamplesBuffer::new(
            self.buffer.channel_count(),
            self.buffer.sample_rate(),
            samples,
        ));
        self.apply_speed();
        self.sink.play();
        self.state = HandleState::Started;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        if self.state == HandleState::Stopped {
            return Err(PlaybackError::AlreadyStopped);
        }
        self.sink.stop();
        self.state = HandleState::Stopped;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), PlaybackError> {
        self.speed = rate;
        self.apply_speed();
        Ok(())
    }

    fn set_detune(&mut self, cents: f32) -> Result<(), PlaybackError> {
        self.detune = cents;
        self.apply_speed();
        Ok(())
    }
}

/// Default output device via rodio.
///
/// If no device can be opened the output still works as a clock; every
/// handle request then fails with [`PlaybackError::NoDevice`].
pub struct RodioOutput {
    // Keep the stream alive or audio will stop immediately.
    stream: Option<(OutputStream, OutputStreamHandle)>,
    open_error: Option<String>,
    epoch: Instant,
}

impl RodioOutput {
    pub fn open_default() -> Self {
        match OutputStream::try_default() {
            Ok(stream) => {
                tracing::info!("audio output opened");
                Self {
                    stream: Some(stream),
                    open_error: None,
                    epoch: Instant::now(),
                }
            }
            Err(e) => {
                tracing::warn!("no audio output available: {}", e);
                Self {
                    stream: None,
                    open_error: Some(e.to_string()),
                    epoch: Instant::now(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.stream.is_some()
    }
}

impl AudioOutput for RodioOutput {
    type Handle = RodioHandle;

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn create_handle(&mut self, buffer: Arc<AudioBuffer>) -> Result<RodioHandle, PlaybackError> {
        let Some((_, handle)) = &self.stream else {
            let reason = self.open_error.clone().unwrap_or_else(|| "not opened".into());
            return Err(PlaybackError::NoDevice(reason));
        };
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Sink(e.to_string()))?;
        sink.pause();
        Ok(RodioHandle {
            sink,
            buffer,
            speed: 1.0,
            detune: 0.0,
            state: HandleState::Fresh,
        })
    }
}
