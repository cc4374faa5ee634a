// src/audio/waveform/renderer.rs
//! Bar rendering for the waveform.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::WaveformStyle;

/// Smallest bar drawn for silence, in eighths of a cell.
pub const MIN_BAR_EIGHTHS: usize = 2;

/// Peaks are boosted so that speech fills the widget.
const LEVEL_GAIN: f32 = 1.5;

/// Partial-cell block characters, indexed by eighths (1..=7).
const PARTIAL: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// Bar height in eighths of a cell for a peak `level` in a widget `height`
/// cells tall.
pub fn bar_eighths(level: f32, height: u16) -> usize {
    let max = height as usize * 8;
    let scaled = (level.abs() * LEVEL_GAIN * max as f32).round() as usize;
    scaled.max(MIN_BAR_EIGHTHS).min(max)
}

/// Stateless widget drawing bars bottom-up. Only cells a bar occupies are
/// touched, so the played colour never bleeds into gaps or empty space.
pub struct WaveformView<'a> {
    levels: &'a [f32],
    progress: f64,
    style: WaveformStyle,
}

impl<'a> WaveformView<'a> {
    pub fn new(levels: &'a [f32], progress: f64, style: WaveformStyle) -> Self {
        Self {
            levels,
            progress: progress.clamp(0.0, 100.0),
            style,
        }
    }

    /// Columns (relative to the widget) strictly left of this are played.
    fn played_columns(&self, width: u16) -> f64 {
        self.progress / 100.0 * width as f64
    }
}

impl Widget for WaveformView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.style.bar_width == 0 {
            return;
        }
        let step = self.style.bar_width + self.style.gap;
        let played_px = self.played_columns(area.width);

        for (i, &level) in self.levels.iter().enumerate() {
            let left = i as u16 * step;
            if left >= area.width {
                break;
            }
            let eighths = bar_eighths(level, area.height);
            let full_rows = eighths / 8;
            let partial = eighths % 8;

            for dx in 0..self.style.bar_width.min(area.width - left) {
                let col = left + dx;
                let color = if (col as f64) < played_px {
                    self.style.played
                } else {
                    self.style.unplayed
                };
                let x = area.x + col;

                for row in 0..full_rows as u16 {
                    let y = area.y + area.height - 1 - row;
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char('█').set_fg(color);
                    }
                }
                if partial > 0 && (full_rows as u16) < area.height {
                    let y = area.y + area.height - 1 - full_rows as u16;
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(PARTIAL[partial]).set_fg(color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn style() -> WaveformStyle {
        WaveformStyle {
            bar_width: 2,
            gap: 1,
            played: Color::Green,
            unplayed: Color::Gray,
        }
    }

    #[test]
    fn test_bar_height_floor_and_ceiling() {
        assert_eq!(bar_eighths(0.0, 4), MIN_BAR_EIGHTHS);
        assert_eq!(bar_eighths(1.0, 4), 32);
        assert_eq!(bar_eighths(0.5, 4), 24);
    }

    #[test]
    fn test_silent_bar_is_minimum_block() {
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        WaveformView::new(&[0.0], 0.0, style()).render(area, &mut buf);

        assert_eq!(buf[(0, 1)].symbol(), "▂");
        assert_eq!(buf[(1, 1)].symbol(), "▂");
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].symbol(), " ");
    }

    #[test]
    fn test_played_overlay_only_colours_bars() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        WaveformView::new(&[1.0, 1.0], 50.0, style()).render(area, &mut buf);

        // First bar (cols 0-1) is left of the playhead at col 3.
        assert_eq!(buf[(0, 0)].fg, Color::Green);
        assert_eq!(buf[(1, 1)].fg, Color::Green);
        // Gap cell stays untouched.
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].fg, Color::Reset);
        // Second bar starts at col 3, not yet played.
        assert_eq!(buf[(3, 0)].fg, Color::Gray);
        assert_eq!(buf[(4, 1)].symbol(), "█");
    }

    #[test]
    fn test_full_progress_colours_everything_drawn() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        WaveformView::new(&[0.2, 0.9], 100.0, style()).render(area, &mut buf);
        for x in [0u16, 1, 3, 4] {
            assert_eq!(buf[(x, 0)].fg, Color::Green);
        }
        assert_eq!(buf[(5, 0)].fg, Color::Reset);
    }
}
