// src/audio/transport.rs
//! Transport controller: play, pause, seek, skip and natural end over
//! single-use playback handles.

use std::sync::Arc;

use super::output::{AudioOutput, PlaybackHandle};
use super::pcm::{decode_base64_pcm, AudioBuffer, DecodeError, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use super::position::{effective_rate, PlaybackPosition};
use super::progress::{Progress, ProgressTracker};

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;
pub const MIN_DETUNE: f32 = -1200.0;
pub const MAX_DETUNE: f32 = 1200.0;

/// Where the transport is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing decoded.
    Idle,
    /// Audio decoded, no live handle.
    Stopped,
    /// A live handle is producing sound.
    Playing,
}

/// Identifies one synthesis request. Results carrying an older ticket than
/// the latest request are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(u64);

/// What happened to a synthesis result handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Decoded and loaded; playback was started from the beginning.
    Loaded,
    /// A newer request (or a clear) superseded it.
    Stale,
}

/// Result of a play or toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    Paused,
    AlreadyPlaying,
    /// Nothing decoded yet; the caller should synthesize first.
    NeedsSynthesis,
    /// The output refused to start; the transport stayed stopped.
    Failed,
}

/// Owns the decoded clip, the single live handle and the output it came
/// from. Every state change that replaces a handle stops the old one before
/// the new one starts, within the same call.
pub struct Transport<O: AudioOutput> {
    output: O,
    buffer: Option<Arc<AudioBuffer>>,
    handle: Option<O::Handle>,
    snapshot: PlaybackPosition,
    /// Set by the natural end; position then reads as the full duration
    /// while the next play starts over.
    ended: bool,
    speed: f32,
    detune: f32,
    sample_rate: u32,
    channels: u16,
    generation: u64,
    tracker: ProgressTracker,
}

impl<O: AudioOutput> Transport<O> {
    /// Transport decoding the speech service format (24 kHz mono).
    pub fn new(output: O) -> Self {
        Self::with_format(output, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
    }

    pub fn with_format(output: O, sample_rate: u32, channels: u16) -> Self {
        Self {
            output,
            buffer: None,
            handle: None,
            snapshot: PlaybackPosition::new(0.0, 0.0, 1.0),
            ended: false,
            speed: 1.0,
            detune: 0.0,
            sample_rate,
            channels,
            generation: 0,
            tracker: ProgressTracker::new(),
        }
    }

    pub fn state(&self) -> TransportState {
        match (&self.buffer, &self.handle) {
            (None, _) => TransportState::Idle,
            (Some(_), None) => TransportState::Stopped,
            (Some(_), Some(_)) => TransportState::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    /// Clip length, or `None` while idle.
    pub fn duration(&self) -> Option<f64> {
        self.buffer.as_ref().map(|b| b.duration())
    }

    pub fn buffer(&self) -> Option<&Arc<AudioBuffer>> {
        self.buffer.as_ref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn detune(&self) -> f32 {
        self.detune
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_armed()
    }

    /// Current position in seconds; 0 while idle.
    pub fn position(&self) -> f64 {
        let Some(duration) = self.duration() else {
            return 0.0;
        };
        if self.handle.is_some() {
            self.snapshot.at(self.output.now(), duration)
        } else if self.ended {
            duration
        } else {
            self.snapshot.pause_offset.clamp(0.0, duration)
        }
    }

    // ── Synthesis results ──

    /// Start a new synthesis request. Any playback stops now; results of
    /// earlier requests become stale.
    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.generation += 1;
        self.release_handle();
        self.rest_at(0.0);
        tracing::debug!(generation = self.generation, "synthesis requested");
        GenerationTicket(self.generation)
    }

    /// True if no newer request or clear happened since `ticket` was issued.
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Decode a synthesis result and start playing it from the beginning.
    ///
    /// Stale results are discarded without decoding. A decode failure
    /// leaves the transport untouched.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        payload: &str,
    ) -> Result<Applied, DecodeError> {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale synthesis result"
            );
            return Ok(Applied::Stale);
        }
        let buffer = decode_base64_pcm(payload, self.sample_rate, self.channels)?;
        self.load(buffer);
        Ok(Applied::Loaded)
    }

    /// Replace the current clip and start playing it from 0.
    pub fn load(&mut self, buffer: AudioBuffer) {
        self.release_handle();
        tracing::info!(
            duration = buffer.duration(),
            sample_rate = buffer.sample_rate(),
            channels = buffer.channel_count(),
            "audio loaded"
        );
        self.buffer = Some(Arc::new(buffer));
        self.rest_at(0.0);
        self.start_at(0.0);
    }

    // ── Transport controls ──

    pub fn play(&mut self) -> PlayOutcome {
        match self.state() {
            TransportState::Idle => PlayOutcome::NeedsSynthesis,
            TransportState::Playing => PlayOutcome::AlreadyPlaying,
            TransportState::Stopped => {
                let duration = self.duration().unwrap_or(0.0);
                let offset = if self.ended || self.snapshot.pause_offset >= duration {
                    0.0
                } else {
                    self.snapshot.pause_offset
                };
                if self.start_at(offset) {
                    PlayOutcome::Started
                } else {
                    PlayOutcome::Failed
                }
            }
        }
    }

    /// Stop the live handle and remember where it was. Returns false if
    /// nothing was playing.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let position = self.position();
        self.release_handle();
        self.rest_at(position);
        tracing::debug!(position, "paused");
        true
    }

    pub fn toggle(&mut self) -> PlayOutcome {
        if self.pause() {
            PlayOutcome::Paused
        } else {
            self.play()
        }
    }

    /// Jump to `target` seconds, clamped to the clip.
    pub fn seek(&mut self, target: f64) {
        let Some(duration) = self.duration() else {
            return;
        };
        let target = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, duration)
        };

        if self.is_playing() {
            if target >= duration {
                self.finish();
            } else {
                self.start_at(target);
            }
        } else {
            self.rest_at(target);
        }
        tracing::trace!(target, "seek");
    }

    /// Seek to a fraction (`0.0..=1.0`) of the clip.
    pub fn seek_fraction(&mut self, fraction: f64) {
        if let Some(duration) = self.duration() {
            self.seek(fraction.clamp(0.0, 1.0) * duration);
        }
    }

    /// Seek relative to the current position.
    pub fn skip(&mut self, delta: f64) {
        if self.buffer.is_none() {
            return;
        }
        self.seek(self.position() + delta);
    }

    pub fn set_speed(&mut self, rate: f32) {
        if rate.is_nan() {
            return;
        }
        let rate = rate.clamp(MIN_SPEED, MAX_SPEED);
        self.rebase(rate, self.detune);
        self.speed = rate;
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = handle.set_rate(rate) {
                tracing::warn!("failed to change playback rate: {}", e);
            }
        }
    }

    pub fn set_pitch(&mut self, cents: f32) {
        if cents.is_nan() {
            return;
        }
        let cents = cents.clamp(MIN_DETUNE, MAX_DETUNE);
        self.rebase(self.speed, cents);
        self.detune = cents;
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = handle.set_detune(cents) {
                tracing::warn!("failed to change detune: {}", e);
            }
        }
    }

    /// Drop the clip and every derived value, and invalidate in-flight
    /// synthesis requests.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.release_handle();
        self.buffer = None;
        self.rest_at(0.0);
        tracing::debug!("transport cleared");
    }

    /// Advance the progress tracker by one frame.
    ///
    /// Returns `None` when the transport is not playing. Reaching the end
    /// of the clip stops playback and reports `ended`.
    pub fn tick(&mut self) -> Option<Progress> {
        if !self.tracker.begin_tick() {
            return None;
        }
        let (Some(duration), true) = (self.duration(), self.handle.is_some()) else {
            // Raced with a pause or clear.
            self.tracker.disarm();
            return None;
        };

        let position = self.snapshot.at(self.output.now(), duration);
        if position >= duration {
            self.finish();
            return Some(Progress::new(duration, duration, true));
        }
        Some(Progress::new(position, duration, false))
    }

    // ── Internals ──

    /// Natural end: stop, show the full duration, restart from 0 next time.
    fn finish(&mut self) {
        self.release_handle();
        self.rest_at(0.0);
        self.ended = true;
        tracing::info!("playback reached end");
    }

    fn rest_at(&mut self, offset: f64) {
        let rate = effective_rate(self.speed, self.detune);
        self.snapshot = PlaybackPosition::new(offset, self.output.now(), rate);
        self.ended = false;
    }

    /// While playing, re-anchor the snapshot so time already played keeps
    /// the rate it was played at.
    fn rebase(&mut self, speed: f32, detune: f32) {
        if let (Some(duration), true) = (self.duration(), self.handle.is_some()) {
            let now = self.output.now();
            self.snapshot = self.snapshot.rebased(now, duration, effective_rate(speed, detune));
        }
    }

    fn release_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.stop() {
                tracing::debug!("ignoring stop failure: {}", e);
            }
        }
        self.tracker.disarm();
    }

    /// Replace the live handle with a new one at `offset`. On failure the
    /// transport is left stopped at `offset`.
    fn start_at(&mut self, offset: f64) -> bool {
        self.release_handle();
        let Some(buffer) = self.buffer.clone() else {
            return false;
        };

        let mut handle = match self.output.create_handle(buffer) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("could not create playback handle: {}", e);
                self.rest_at(offset);
                return false;
            }
        };
        if let Err(e) = handle.set_rate(self.speed) {
            tracing::warn!("failed to set playback rate: {}", e);
        }
        if let Err(e) = handle.set_detune(self.detune) {
            tracing::warn!("failed to set detune: {}", e);
        }
        if let Err(e) = handle.start(offset) {
            tracing::warn!("playback failed to start at {:.2}s: {}", offset, e);
            self.rest_at(offset);
            return false;
        }

        self.rest_at(offset);
        self.handle = Some(handle);
        self.tracker.arm();
        tracing::debug!(offset, speed = self.speed, detune = self.detune, "playback started");
        true
    }
}

impl<O: AudioOutput> Drop for Transport<O> {
    fn drop(&mut self) {
        self.release_handle();
    }
}
