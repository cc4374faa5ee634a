// src/audio/progress.rs
//! Progress tracking bound to the playing state.

/// Snapshot of playback progress handed to the UI each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Current position in seconds.
    pub position: f64,
    /// Clip length in seconds.
    pub duration: f64,
    /// True on the frame where playback reached the end.
    pub ended: bool,
}

impl Progress {
    pub fn new(position: f64, duration: f64, ended: bool) -> Self {
        Self {
            position,
            duration,
            ended,
        }
    }

    /// Position as a percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        percent_of(self.position, self.duration)
    }
}

/// `position / duration` as a percentage, 0 for an empty clip.
pub fn percent_of(position: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (position / duration * 100.0).clamp(0.0, 100.0)
}

/// Cancellable per-frame task. Armed whenever the transport enters the
/// playing state and disarmed on every exit, so ticks outside of playback
/// do nothing.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    armed: bool,
    ticks: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        if !self.armed {
            tracing::trace!("progress tracker armed");
        }
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        if self.armed {
            tracing::trace!(ticks = self.ticks, "progress tracker disarmed");
        }
        self.armed = false;
        self.ticks = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Count a frame; returns false if the tracker is not running.
    pub(crate) fn begin_tick(&mut self) -> bool {
        if self.armed {
            self.ticks += 1;
        }
        self.armed
    }
}
