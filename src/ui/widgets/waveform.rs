// src/ui/widgets/waveform.rs
//! Waveform visualizer widget wrapper.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
    Frame,
};

use crate::audio::{Waveform, WaveformStyle};

/// Render the clip waveform inside a bordered block.
pub fn render_waveform(f: &mut Frame<'_>, area: Rect, waveform: &mut Waveform, progress: f64, style: WaveformStyle) {
    let block = Block::default().borders(Borders::ALL).title(" Waveform ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    waveform.render(f, inner, progress, style);
}
