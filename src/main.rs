// src/main.rs
//! NeoFlow Speech - terminal speech studio.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use neoflow_speech::{
    app::App,
    audio::RodioOutput,
    config::{self, Settings, UiStateStore},
    history::HistoryLog,
    synth::{GeminiClient, Voice},
    ui,
};

/// Type text, pick a voice, listen back.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file; the terminal belongs to the UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Voice to start with, overriding the saved one
    #[arg(long)]
    voice: Option<Voice>,
}

fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = config::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let log_path = args.log_file.clone().unwrap_or_else(|| data_dir.join("neoflow-speech.log"));
    init_tracing(&log_path)?;
    info!("NeoFlow Speech starting");

    let settings_path = args
        .config
        .clone()
        .or_else(config::default_settings_path)
        .context("no config directory available; pass --config")?;
    let settings = Settings::load(&settings_path);
    info!("  settings: {}", settings_path.display());

    let synthesizer = GeminiClient::new(args.api_key, &settings.synth)?;
    info!("  endpoint: {}", synthesizer.url());

    let output = RodioOutput::open_default();
    if !output.is_available() {
        tracing::warn!("No audio output device; playback is disabled");
    }

    let ui_store = config::config_dir().map(|dir| UiStateStore::in_dir(&dir));
    let history = Some(HistoryLog::in_dir(&data_dir));

    let mut app = App::new(settings, output, Arc::new(synthesizer), ui_store, history)
        .with_settings_path(settings_path);
    if let Some(voice) = args.voice {
        app.select_voice(voice);
    }

    ui::run(app)
}
