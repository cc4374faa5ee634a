// src/app/state.rs
//! Application state management.

use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
    time::Duration,
};

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::{
    audio::{
        progress::percent_of, Applied, AudioOutput, GenerationTicket, PlayOutcome, Transport, Waveform,
        WaveformStyle,
    },
    config::{Settings, UiState, UiStateStore},
    history::{EntryKind, HistoryLog},
    synth::{SpeechSynthesizer, SynthesisError, SynthesisRequest, Voice},
    ui::{
        keybindings::{key_to_action, Action, Focus},
        layout::compute_layout,
        widgets::{render_editor, render_player_panel, render_settings_panel, render_voice_list, render_waveform, PlayerView},
    },
};

/// A finished synthesis call, sent from the worker thread to the UI loop.
pub struct SynthesisMessage {
    pub ticket: GenerationTicket,
    pub request: SynthesisRequest,
    pub result: Result<String, SynthesisError>,
}

/// Main application state.
pub struct App<O: AudioOutput> {
    pub settings: Settings,
    /// Text to synthesize
    pub text: String,
    pub voice: Voice,
    pub focus: Focus,

    /// Playback engine
    pub transport: Transport<O>,
    /// Waveform of the current clip
    pub waveform: Waveform,

    /// Ticket of the request in flight, if any
    pub generating: Option<GenerationTicket>,
    /// Last error shown to the user
    pub error: Option<String>,

    synthesizer: Arc<dyn SpeechSynthesizer>,
    /// Synthesis channel sender (worker -> UI)
    synth_tx: Sender<SynthesisMessage>,
    /// Synthesis channel receiver
    synth_rx: Receiver<SynthesisMessage>,

    ui_store: Option<UiStateStore>,
    history: Option<HistoryLog>,
    /// Where theme and mode changes are written back
    settings_path: Option<PathBuf>,
    /// Speech clips in the activity log
    pub clips: usize,
}

impl<O: AudioOutput> App<O> {
    /// Create a new application instance, restoring the last text and voice.
    pub fn new(
        settings: Settings,
        output: O,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        ui_store: Option<UiStateStore>,
        history: Option<HistoryLog>,
    ) -> Self {
        let restored = ui_store.as_ref().map(UiStateStore::load).unwrap_or_default();
        let (synth_tx, synth_rx) = mpsc::channel::<SynthesisMessage>();
        let transport = Transport::with_format(output, settings.playback.sample_rate, settings.playback.channels);
        let clips = history.as_ref().map(|h| h.stats().tts).unwrap_or(0);

        Self {
            text: restored.text.unwrap_or_default(),
            voice: restored.voice.unwrap_or(settings.synth.default_voice),
            focus: Focus::Editor,
            settings,
            transport,
            waveform: Waveform::new(),
            generating: None,
            error: None,
            synthesizer,
            synth_tx,
            synth_rx,
            ui_store,
            history,
            settings_path: None,
            clips,
        }
    }

    /// Save appearance changes to `path`.
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_some()
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let skip = self.settings.playback.skip_seconds;
        let speed_step = self.settings.playback.speed_step;
        let pitch_step = self.settings.playback.pitch_step;

        match key_to_action(&key, self.focus) {
            Action::Insert(c) => self.text.push(c),
            Action::Newline => self.text.push('\n'),
            Action::Backspace => {
                self.text.pop();
            }
            Action::FocusEditor => self.focus = Focus::Editor,
            Action::FocusControls => {
                self.focus = Focus::Controls;
                self.persist_ui_state();
            }
            Action::TogglePlay => self.toggle_play(),
            Action::Generate => self.generate(),
            Action::Skip(direction) => self.transport.skip(direction as f64 * skip),
            Action::SeekStart => self.transport.seek(0.0),
            Action::SeekEnd => {
                if let Some(duration) = self.transport.duration() {
                    self.transport.seek(duration);
                }
            }
            Action::Scrub(tenths) => self.transport.seek_fraction(tenths as f64 / 10.0),
            Action::Speed(direction) => {
                let speed = self.transport.speed() + direction as f32 * speed_step;
                // Keep the value on the step grid.
                self.transport.set_speed((speed / speed_step).round() * speed_step);
            }
            Action::Pitch(direction) => {
                let cents = self.transport.detune() + direction as f32 * pitch_step;
                self.transport.set_pitch(cents);
            }
            Action::Voice(step) => self.select_voice(self.voice.cycle(step as isize)),
            Action::CycleTheme => {
                self.settings.appearance.theme = self.settings.appearance.theme.next();
                self.persist_settings();
            }
            Action::ToggleMode => {
                self.settings.appearance.mode = self.settings.appearance.mode.toggled();
                self.persist_settings();
            }
            Action::Clear => self.clear(),
            Action::Quit => {
                self.shutdown();
                return true;
            }
            Action::None => {}
        }
        false
    }

    /// Start a synthesis request for the current text on a worker thread.
    /// Playback stops now; the result is picked up by [`Self::process_synthesis`].
    pub fn generate(&mut self) {
        if self.text.trim().is_empty() {
            return;
        }
        self.error = None;
        let ticket = self.transport.begin_generation();
        self.generating = Some(ticket);
        self.persist_ui_state();

        let request = SynthesisRequest::new(self.text.clone(), self.voice);
        let synthesizer = Arc::clone(&self.synthesizer);
        let tx = self.synth_tx.clone();
        thread::spawn(move || {
            let result = synthesizer.synthesize(&request);
            let _ = tx.send(SynthesisMessage {
                ticket,
                request,
                result,
            });
        });
    }

    /// Play/pause; synthesizes first when nothing has been decoded yet.
    pub fn toggle_play(&mut self) {
        match self.transport.toggle() {
            PlayOutcome::NeedsSynthesis => {
                if !self.is_generating() {
                    self.generate();
                }
            }
            PlayOutcome::Failed => {
                self.error = Some("Audio output is unavailable.".to_string());
            }
            _ => {}
        }
    }

    /// Process any finished synthesis calls. Returns true if one was applied
    /// or failed (stale results do not count).
    pub fn process_synthesis(&mut self) -> bool {
        let mut handled = false;
        while let Ok(message) = self.synth_rx.try_recv() {
            handled |= self.apply_synthesis(message);
        }
        handled
    }

    /// Block up to `timeout` for the in-flight request to finish.
    pub fn wait_for_synthesis(&mut self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while self.is_generating() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.synth_rx.recv_timeout(remaining) {
                Ok(message) => {
                    self.apply_synthesis(message);
                }
                Err(_) => return false,
            }
        }
        true
    }

    fn apply_synthesis(&mut self, message: SynthesisMessage) -> bool {
        let SynthesisMessage {
            ticket,
            request,
            result,
        } = message;
        if !self.transport.is_current(ticket) {
            tracing::debug!("dropping synthesis result from a superseded request");
            return false;
        }
        self.generating = None;

        let audio = match result {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!("synthesis failed: {}", e);
                self.error = Some(e.user_message().to_string());
                return true;
            }
        };

        match self.transport.complete_generation(ticket, &audio) {
            Ok(Applied::Loaded) => {
                if let Some(buffer) = self.transport.buffer() {
                    self.waveform.set_buffer(buffer);
                }
                self.log_history(&request);
            }
            Ok(Applied::Stale) => {}
            Err(e) => {
                tracing::warn!("could not decode synthesized audio: {}", e);
                self.error = Some(format!("The audio returned by the model could not be decoded: {}", e));
            }
        }
        true
    }

    /// Advance one frame: pick up synthesis results and track progress.
    pub fn tick(&mut self) {
        self.process_synthesis();
        self.transport.tick();
    }

    /// Drop the clip, the text and the settings tweaks.
    pub fn clear(&mut self) {
        self.transport.clear();
        self.transport.set_speed(1.0);
        self.transport.set_pitch(0.0);
        self.waveform.clear();
        self.text.clear();
        self.error = None;
        self.generating = None;
        if let Some(store) = &self.ui_store {
            if let Err(e) = store.remove_text() {
                tracing::warn!("Failed to clear saved text: {:#}", e);
            }
        }
    }

    pub fn select_voice(&mut self, voice: Voice) {
        self.voice = voice;
        self.persist_ui_state();
    }

    /// Stop playback and save editor state.
    pub fn shutdown(&mut self) {
        self.persist_ui_state();
        self.transport.clear();
    }

    /// Progress in percent for drawing.
    pub fn progress_percent(&self) -> f64 {
        percent_of(self.transport.position(), self.transport.duration().unwrap_or(0.0))
    }

    fn persist_ui_state(&self) {
        let Some(store) = &self.ui_store else {
            return;
        };
        let state = UiState {
            text: Some(self.text.clone()),
            voice: Some(self.voice),
        };
        if let Err(e) = store.save(&state) {
            tracing::warn!("Failed to save UI state: {:#}", e);
        }
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            tracing::warn!("Failed to save settings: {:#}", e);
        }
    }

    fn log_history(&mut self, request: &SynthesisRequest) {
        let Some(history) = &self.history else {
            return;
        };
        let title = format!("Speech: {}", request.voice);
        match history.record(EntryKind::Tts, &title, &request.text) {
            Ok(_) => self.clips += 1,
            Err(e) => tracing::warn!("Failed to record history: {}", e),
        }
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area());
        let appearance = self.settings.appearance.clone();
        let accent = appearance.theme.accent();

        render_editor(f, layout.editor, &self.text, self.focus == Focus::Editor, accent);
        render_voice_list(f, layout.voices, self.voice, accent);
        render_settings_panel(
            f,
            layout.settings,
            self.transport.speed(),
            self.transport.detune(),
            appearance.theme,
            appearance.mode,
        );

        let view = PlayerView {
            position: self.transport.position(),
            duration: self.transport.duration().unwrap_or(0.0),
            state: self.transport.state(),
            generating: self.is_generating(),
            error: self.error.as_deref(),
            clips: self.clips,
            accent,
        };
        render_player_panel(f, layout.player, &view);

        let style = WaveformStyle {
            bar_width: appearance.bar_width,
            gap: appearance.bar_gap,
            played: accent,
            unplayed: appearance.mode.muted(),
        };
        let progress = self.progress_percent();
        render_waveform(f, layout.waveform, &mut self.waveform, progress, style);
    }
}
