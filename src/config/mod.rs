// src/config/mod.rs
//! Configuration module for user settings, themes, and persisted UI state.

pub mod theme;
pub mod ui_state;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::synth::Voice;

pub use theme::{Mode, Theme};
pub use ui_state::{UiState, UiStateStore};

const APP_DIR: &str = "neoflow-speech";
const SETTINGS_FILE: &str = "settings.json";

/// Directory holding settings and persisted UI state.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// Directory holding the activity log and the log file.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(SETTINGS_FILE))
}

/// All user-tunable settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub synth: SynthSettings,
    pub playback: PlaybackSettings,
    pub appearance: AppearanceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthSettings {
    /// API base, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub endpoint: String,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Voice used when nothing was persisted
    pub default_voice: Voice,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-tts".to_string(),
            request_timeout_secs: 60,
            default_voice: Voice::Kore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Sample rate of the PCM the service returns
    pub sample_rate: u32,
    pub channels: u16,
    /// Seconds moved by the skip keys
    pub skip_seconds: f64,
    pub speed_step: f32,
    /// Cents moved by the pitch keys
    pub pitch_step: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
            skip_seconds: 10.0,
            speed_step: 0.1,
            pitch_step: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    pub theme: Theme,
    pub mode: Mode,
    pub bar_width: u16,
    pub bar_gap: u16,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Blue,
            mode: Mode::Dark,
            bar_width: 2,
            bar_gap: 1,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults if the file is missing or
    /// unreadable.
    pub fn load(path: &Path) -> Settings {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings at {}. Using defaults.", path.display());
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read settings {}: {}. Using defaults.", path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!("Failed to parse settings {}: {}. Using defaults.", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Replace values that would make the player unusable.
    fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if self.playback.sample_rate == 0 {
            self.playback.sample_rate = defaults.playback.sample_rate;
        }
        if self.playback.channels == 0 {
            self.playback.channels = defaults.playback.channels;
        }
        if self.playback.skip_seconds.is_nan() || self.playback.skip_seconds <= 0.0 {
            self.playback.skip_seconds = defaults.playback.skip_seconds;
        }
        if !(self.playback.speed_step.is_finite() && self.playback.speed_step > 0.0) {
            self.playback.speed_step = defaults.playback.speed_step;
        }
        if !(self.playback.pitch_step.is_finite() && self.playback.pitch_step > 0.0) {
            self.playback.pitch_step = defaults.playback.pitch_step;
        }
        if self.appearance.bar_width == 0 {
            self.appearance.bar_width = defaults.appearance.bar_width;
        }
        if self.synth.request_timeout_secs == 0 {
            self.synth.request_timeout_secs = defaults.synth.request_timeout_secs;
        }
        self
    }
}
