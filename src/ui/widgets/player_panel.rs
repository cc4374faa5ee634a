// src/ui/widgets/player_panel.rs
//! Player panel: transport state, time and progress.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::audio::TransportState;

/// Everything the panel shows, borrowed from the app for one frame.
pub struct PlayerView<'a> {
    pub position: f64,
    pub duration: f64,
    pub state: TransportState,
    pub generating: bool,
    pub error: Option<&'a str>,
    /// Clips synthesized so far, from the activity log
    pub clips: usize,
    pub accent: Color,
}

/// Seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render the player panel.
pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, view: &PlayerView<'_>) {
    let title = format!(" Player ({} clips) ", view.clips);
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let play_pause_icon = match view.state {
        TransportState::Idle => Span::styled(" ⏵ ", Style::default().fg(Color::Gray)),
        TransportState::Stopped => Span::styled(" ⏵ ", Style::default().fg(Color::Yellow)),
        TransportState::Playing => Span::styled(" ⏸ ", Style::default().fg(Color::Green)),
    };

    let mut controls = vec![
        Span::styled(" ⏪ ", Style::default().fg(Color::Cyan)), // Skip back (←)
        Span::raw(" "),
        play_pause_icon, // Play/Pause (space)
        Span::raw(" "),
        Span::styled(" ⏩ ", Style::default().fg(Color::Cyan)), // Skip forward (→)
    ];
    if view.generating {
        controls.push(Span::styled(
            "   Generating...",
            Style::default().fg(view.accent).add_modifier(Modifier::ITALIC),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        inner[0],
    );

    let ratio = if view.duration > 0.0 {
        (view.position / view.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_label = format!("{} / {}", format_time(view.position), format_time(view.duration));
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(view.accent))
            .ratio(ratio)
            .label(time_label),
        inner[1],
    );

    let status = match (view.error, view.state) {
        (Some(error), _) => Line::styled(error.to_string(), Style::default().fg(Color::Red)),
        (None, TransportState::Idle) => Line::styled(
            "Write some text and press g to generate speech.",
            Style::default().fg(Color::DarkGray),
        ),
        (None, _) => Line::styled(
            "space play/pause  ←/→ skip  0-9 scrub  c clear  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), inner[2]);
}
