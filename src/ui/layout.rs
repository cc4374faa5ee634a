// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedLayout {
    pub editor: Rect,
    pub voices: Rect,
    pub settings: Rect,
    pub player: Rect,
    /// Bottom waveform strip
    pub waveform: Rect,
}

/// Split the terminal: editor and side column on top, player and waveform
/// below.
pub fn compute_layout(area: Rect) -> ComputedLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(rows[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(6)])
        .split(columns[1]);

    ComputedLayout {
        editor: columns[0],
        voices: side[0],
        settings: side[1],
        player: rows[1],
        waveform: rows[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_stay_inside_area() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = compute_layout(area);
        for rect in [layout.editor, layout.voices, layout.settings, layout.player, layout.waveform] {
            assert!(area.contains(rect.as_position()));
            assert!(rect.right() <= area.right());
            assert!(rect.bottom() <= area.bottom());
        }
        assert_eq!(layout.player.height, 7);
        assert_eq!(layout.waveform.bottom(), area.bottom());
    }
}
