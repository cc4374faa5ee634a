// src/lib.rs
//! NeoFlow Speech - a terminal speech studio.
//!
//! This library provides the synthesis client, the playback engine with its
//! waveform view, and the persisted settings and activity log.

pub mod app;
pub mod audio;
pub mod config;
pub mod history;
pub mod synth;
pub mod ui;
