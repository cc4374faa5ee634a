// src/ui/widgets/editor.rs
//! Text editor panel.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the text to synthesize, with a cursor when focused.
pub fn render_editor(f: &mut Frame<'_>, area: Rect, text: &str, focused: bool, accent: Color) {
    let border = if focused {
        Style::default().fg(accent)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" Text ({} chars) ", text.chars().count()));

    let mut lines: Vec<Line> = text.split('\n').map(|l| Line::raw(l.to_string())).collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("▏", Style::default().fg(accent)));
        }
    } else if text.is_empty() {
        lines = vec![Line::styled(
            "Press Tab to start typing...",
            Style::default().fg(Color::DarkGray),
        )];
    }

    // Keep the end of long text in view.
    let inner_height = area.height.saturating_sub(2);
    let scroll = (lines.len() as u16).saturating_sub(inner_height);

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}
