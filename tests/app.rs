// tests/app.rs
//! App flow with a scripted synthesizer and the fake device.

mod common;

use std::{sync::Arc, thread, time::Duration};

use common::{assert_close, pcm_payload, FakeOutput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use neoflow_speech::{
    app::App,
    audio::TransportState,
    config::{Mode, Settings, Theme, UiState, UiStateStore},
    history::{EntryKind, HistoryLog},
    synth::{SpeechSynthesizer, SynthesisError, SynthesisErrorKind, SynthesisRequest, Voice},
};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

/// Answers by text: `slow` takes a while, `quota` and `garbage` fail.
struct ScriptedSynth;

impl SpeechSynthesizer for ScriptedSynth {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        match request.text.as_str() {
            "slow" => {
                thread::sleep(Duration::from_millis(200));
                Ok(pcm_payload(9.0))
            }
            "quota" => Err(SynthesisError::new(SynthesisErrorKind::RateLimited, "HTTP 429")),
            "garbage" => Ok("%%%".to_string()),
            _ => Ok(pcm_payload(2.0)),
        }
    }
}

struct Fixture {
    app: App<FakeOutput>,
    output: FakeOutput,
    store: UiStateStore,
    history: HistoryLog,
    _dir: TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = UiStateStore::in_dir(dir.path());
    let history = HistoryLog::in_dir(dir.path());
    let output = FakeOutput::new();
    let app = App::new(
        Settings::default(),
        output.clone(),
        Arc::new(ScriptedSynth),
        Some(store.clone()),
        Some(history.clone()),
    );
    Fixture {
        app,
        output,
        store,
        history,
        _dir: dir,
    }
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_generate_plays_and_logs() {
    let mut fx = fixture();
    fx.app.text = "hello there".to_string();
    fx.app.generate();
    assert!(fx.app.is_generating());
    assert!(fx.app.wait_for_synthesis(WAIT));

    assert_eq!(fx.app.transport.state(), TransportState::Playing);
    assert_close(fx.app.transport.duration().unwrap(), 2.0);
    assert!(!fx.app.waveform.is_empty());
    assert!(fx.app.error.is_none());

    let entries = fx.history.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Tts);
    assert_eq!(entries[0].title, "Speech: Kore");
    assert_eq!(entries[0].preview, "hello there");

    assert_eq!(fx.store.load().text.as_deref(), Some("hello there"));
}

#[test]
fn test_blank_text_does_not_generate() {
    let mut fx = fixture();
    fx.app.text = "  \n ".to_string();
    fx.app.generate();
    assert!(!fx.app.is_generating());
    assert_eq!(fx.app.transport.state(), TransportState::Idle);
}

#[test]
fn test_late_response_is_ignored() {
    let mut fx = fixture();
    fx.app.text = "slow".to_string();
    fx.app.generate();
    fx.app.text = "fast".to_string();
    fx.app.generate();

    assert!(fx.app.wait_for_synthesis(WAIT));
    assert_close(fx.app.transport.duration().unwrap(), 2.0);

    thread::sleep(Duration::from_millis(500));
    assert!(!fx.app.process_synthesis());
    assert_close(fx.app.transport.duration().unwrap(), 2.0);
    assert_eq!(fx.output.created(), 1);
    assert_eq!(fx.history.entries().len(), 1);
}

#[test]
fn test_synthesis_error_keeps_text() {
    let mut fx = fixture();
    fx.app.text = "quota".to_string();
    fx.app.generate();
    assert!(fx.app.wait_for_synthesis(WAIT));

    assert_eq!(fx.app.error.as_deref(), Some(SynthesisErrorKind::RateLimited.message()));
    assert_eq!(fx.app.text, "quota");
    assert_eq!(fx.app.transport.state(), TransportState::Idle);
    assert!(fx.history.entries().is_empty());
}

#[test]
fn test_undecodable_audio_is_reported() {
    let mut fx = fixture();
    fx.app.text = "garbage".to_string();
    fx.app.generate();
    assert!(fx.app.wait_for_synthesis(WAIT));

    assert!(fx.app.error.is_some());
    assert_eq!(fx.app.transport.state(), TransportState::Idle);
}

#[test]
fn test_play_without_audio_generates() {
    let mut fx = fixture();
    fx.app.text = "hi".to_string();
    fx.app.toggle_play();
    assert!(fx.app.is_generating());
    assert!(fx.app.wait_for_synthesis(WAIT));
    assert!(fx.app.transport.is_playing());

    fx.app.toggle_play();
    assert_eq!(fx.app.transport.state(), TransportState::Stopped);
}

#[test]
fn test_clear_resets_everything() {
    let mut fx = fixture();
    fx.app.text = "hello".to_string();
    fx.app.generate();
    assert!(fx.app.wait_for_synthesis(WAIT));
    fx.app.transport.set_speed(1.5);

    fx.app.clear();
    assert_eq!(fx.app.transport.state(), TransportState::Idle);
    assert_eq!(fx.app.transport.speed(), 1.0);
    assert!(fx.app.text.is_empty());
    assert!(fx.app.waveform.is_empty());
    assert_eq!(fx.output.live(), 0);
    assert_eq!(fx.store.load().text, None);
}

#[test]
fn test_keyboard_flow() {
    let mut fx = fixture();
    for c in "hey".chars() {
        assert!(!fx.app.on_key(press(KeyCode::Char(c))));
    }
    fx.app.on_key(press(KeyCode::Backspace));
    assert_eq!(fx.app.text, "he");

    fx.app.on_key(press(KeyCode::Tab));
    fx.app.on_key(press(KeyCode::Down));
    assert_eq!(fx.app.voice, Voice::Puck);

    fx.app.on_key(press(KeyCode::Char('g')));
    assert!(fx.app.wait_for_synthesis(WAIT));
    assert!(fx.app.transport.is_playing());

    fx.app.on_key(press(KeyCode::Char('5')));
    assert_close(fx.app.transport.position(), 1.0);
    fx.app.on_key(press(KeyCode::Char(']')));
    assert_close(fx.app.transport.speed() as f64, 1.1);
    fx.app.on_key(press(KeyCode::End));
    assert_eq!(fx.app.transport.state(), TransportState::Stopped);

    assert!(fx.app.on_key(press(KeyCode::Char('q'))));
    let saved = fx.store.load();
    assert_eq!(saved.text.as_deref(), Some("he"));
    assert_eq!(saved.voice, Some(Voice::Puck));
}

#[test]
fn test_restores_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = UiStateStore::in_dir(dir.path());
    store
        .save(&UiState {
            text: Some("welcome back".into()),
            voice: Some(Voice::Fenrir),
        })
        .unwrap();

    let app = App::new(Settings::default(), FakeOutput::new(), Arc::new(ScriptedSynth), Some(store), None);
    assert_eq!(app.text, "welcome back");
    assert_eq!(app.voice, Voice::Fenrir);
}

#[test]
fn test_theme_and_mode_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut app = App::new(Settings::load(&path), FakeOutput::new(), Arc::new(ScriptedSynth), None, None)
        .with_settings_path(path.clone());
    app.on_key(press(KeyCode::Tab));
    app.on_key(press(KeyCode::Char('t')));
    app.on_key(press(KeyCode::Char('m')));
    assert_eq!(app.settings.appearance.theme, Theme::Cyan);
    drop(app);

    let restarted = App::new(Settings::load(&path), FakeOutput::new(), Arc::new(ScriptedSynth), None, None);
    assert_eq!(restarted.settings.appearance.theme, Theme::Cyan);
    assert_eq!(restarted.settings.appearance.mode, Mode::Light);
}

#[test]
fn test_speed_follows_configured_step() {
    let mut settings = Settings::default();
    settings.playback.speed_step = 0.04;
    let mut app = App::new(settings, FakeOutput::new(), Arc::new(ScriptedSynth), None, None);
    app.on_key(press(KeyCode::Tab));

    app.on_key(press(KeyCode::Char(']')));
    assert_close(app.transport.speed() as f64, 1.04);
    app.on_key(press(KeyCode::Char(']')));
    assert_close(app.transport.speed() as f64, 1.08);
    app.on_key(press(KeyCode::Char('[')));
    assert_close(app.transport.speed() as f64, 1.04);
}

#[test]
fn test_clip_count_tracks_history() {
    let fx = fixture();
    fx.history.record(EntryKind::Tts, "Speech: Puck", "earlier").unwrap();
    fx.history.record(EntryKind::Note, "Note", "not speech").unwrap();

    let mut app = App::new(
        Settings::default(),
        FakeOutput::new(),
        Arc::new(ScriptedSynth),
        None,
        Some(fx.history.clone()),
    );
    assert_eq!(app.clips, 1);

    app.text = "one more".to_string();
    app.generate();
    assert!(app.wait_for_synthesis(WAIT));
    assert_eq!(app.clips, 2);
    assert_eq!(fx.history.stats().tts, 2);
}
