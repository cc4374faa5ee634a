// src/config/ui_state.rs
//! Last-used text and voice, kept across sessions.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::synth::Voice;

const UI_STATE_FILE: &str = "ui_state.json";

/// Persisted editor state. Field names are the fixed storage keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(rename = "gemini_tts_text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "gemini_tts_voice", default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

/// JSON file store for [`UiState`].
#[derive(Debug, Clone)]
pub struct UiStateStore {
    path: PathBuf,
}

impl UiStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside the given config directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(UI_STATE_FILE))
    }

    /// Missing or unreadable state reads as empty.
    pub fn load(&self) -> UiState {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable UI state {}: {}", self.path.display(), e);
                UiState::default()
            }),
            Err(_) => UiState::default(),
        }
    }

    pub fn save(&self, state: &UiState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(state).context("failed to serialize UI state")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Forget the stored text but keep the voice.
    pub fn remove_text(&self) -> Result<()> {
        let mut state = self.load();
        state.text = None;
        self.save(&state)
    }
}
