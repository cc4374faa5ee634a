// src/audio/position.rs
//! Playback position derived from an immutable clock snapshot.

/// Snapshot taken when a playback handle starts (or its rate changes).
///
/// Position is never stored while playing; it is recomputed from the host
/// clock so that it cannot drift away from the handle that is producing
/// sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackPosition {
    /// Clip position, in seconds, at the moment of the snapshot.
    pub pause_offset: f64,
    /// Host clock reading at the moment of the snapshot.
    pub session_start_clock: f64,
    /// Seconds of clip consumed per second of host clock.
    pub rate: f64,
}

impl PlaybackPosition {
    pub fn new(pause_offset: f64, session_start_clock: f64, rate: f64) -> Self {
        Self {
            pause_offset,
            session_start_clock,
            rate,
        }
    }

    /// Position at host time `now`, clamped to `[0, duration]`.
    pub fn at(&self, now: f64, duration: f64) -> f64 {
        let elapsed = (now - self.session_start_clock).max(0.0);
        (self.pause_offset + elapsed * self.rate).clamp(0.0, duration.max(0.0))
    }

    /// Fold the time played so far into a new snapshot taken at `now`,
    /// continuing at `rate`.
    pub fn rebased(&self, now: f64, duration: f64, rate: f64) -> Self {
        Self::new(self.at(now, duration), now, rate)
    }
}

/// Effective playback speed of a handle: the speed multiplier combined with
/// a detune in cents, where 1200 cents doubles the rate.
pub fn effective_rate(speed: f32, detune_cents: f32) -> f64 {
    speed as f64 * 2f64.powf(detune_cents as f64 / 1200.0)
}
