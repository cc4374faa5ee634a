// src/ui/widgets/voice_list.rs
//! Voice picker widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::synth::Voice;

/// Render the prebuilt voices with the selected one highlighted.
pub fn render_voice_list(f: &mut Frame<'_>, area: Rect, selected: Voice, accent: Color) {
    let items: Vec<ListItem> = Voice::ALL
        .iter()
        .map(|voice| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<8}", voice.name())),
                Span::styled(voice.character(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(selected.index()));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Voice (↑/↓) "))
        .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut state);
}
