// src/ui/widgets/settings_panel.rs
//! Audio settings panel: speed, pitch and appearance.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::{Mode, Theme};

/// Detune in cents as semitones, e.g. `+2 st`.
pub fn format_semitones(cents: f32) -> String {
    let semis = (cents / 100.0).round() as i32;
    if semis > 0 {
        format!("+{} st", semis)
    } else {
        format!("{} st", semis)
    }
}

pub fn render_settings_panel(f: &mut Frame<'_>, area: Rect, speed: f32, detune: f32, theme: Theme, mode: Mode) {
    let label = Style::default().fg(mode.secondary());
    let value = Style::default().fg(theme.accent());

    let lines = vec![
        Line::from(vec![
            Span::styled("Speed  [ ]  ", label),
            Span::styled(format!("{:.1}x", speed), value),
        ]),
        Line::from(vec![
            Span::styled("Pitch  - =  ", label),
            Span::styled(format_semitones(detune), value),
        ]),
        Line::from(vec![
            Span::styled("Theme  t m  ", label),
            Span::styled(format!("{} / {:?}", theme.label(), mode).to_lowercase(), value),
        ]),
    ];

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Audio Settings ")),
        area,
    );
}
