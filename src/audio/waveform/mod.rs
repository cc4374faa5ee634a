// src/audio/waveform/mod.rs
//! Amplitude waveform of the decoded clip with a played-portion overlay.

mod renderer;

use ratatui::{layout::Rect, style::Color, Frame};

use super::pcm::AudioBuffer;

pub use renderer::{bar_eighths, WaveformView, MIN_BAR_EIGHTHS};

/// Bar geometry and colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformStyle {
    /// Bar width in cells
    pub bar_width: u16,
    /// Gap between bars in cells
    pub gap: u16,
    /// Colour of bars left of the playhead
    pub played: Color,
    /// Colour of bars right of the playhead
    pub unplayed: Color,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            bar_width: 2,
            gap: 1,
            played: Color::Rgb(0x3b, 0x82, 0xf6),
            unplayed: Color::DarkGray,
        }
    }
}

/// Number of bars that fit in `width` cells.
pub fn total_bars(width: u16, bar_width: u16, gap: u16) -> usize {
    let step = bar_width as usize + gap as usize;
    if step == 0 {
        return 0;
    }
    width as usize / step
}

/// Split `samples` into `bars` contiguous chunks and take the peak absolute
/// value of each. Trailing samples that do not fill a chunk are ignored;
/// bars past the end of a very short clip are silent.
pub fn bar_levels(samples: &[f32], bars: usize) -> Vec<f32> {
    if bars == 0 {
        return Vec::new();
    }
    let per_bar = (samples.len() / bars).max(1);
    (0..bars)
        .map(|i| {
            let start = i * per_bar;
            let end = (start + per_bar).min(samples.len());
            samples
                .get(start..end)
                .unwrap_or(&[])
                .iter()
                .fold(0.0f32, |peak, s| peak.max(s.abs()))
        })
        .collect()
}

/// Waveform state for the current clip. Bar peaks are cached per bar count
/// and recomputed when the widget is resized.
#[derive(Debug, Default)]
pub struct Waveform {
    samples: Vec<f32>,
    cache: Option<(usize, Vec<f32>)>,
}

impl Waveform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the samples of a freshly decoded clip.
    pub fn set_buffer(&mut self, buffer: &AudioBuffer) {
        self.samples = buffer.mono_mix();
        self.cache = None;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.cache = None;
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Peaks for `bars` bars, cached.
    pub fn levels(&mut self, bars: usize) -> &[f32] {
        let stale = !matches!(&self.cache, Some((n, _)) if *n == bars);
        if stale {
            self.cache = Some((bars, bar_levels(&self.samples, bars)));
        }
        self.cache.as_ref().map(|(_, levels)| levels.as_slice()).unwrap_or(&[])
    }

    /// Draw into `area` with `progress` in percent.
    pub fn render(&mut self, f: &mut Frame<'_>, area: Rect, progress: f64, style: WaveformStyle) {
        if self.is_empty() {
            return;
        }
        let bars = total_bars(area.width, style.bar_width, style.gap);
        let levels = self.levels(bars);
        f.render_widget(WaveformView::new(levels, progress, style), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_bars_floor() {
        assert_eq!(total_bars(60, 2, 1), 20);
        assert_eq!(total_bars(61, 2, 1), 20);
        assert_eq!(total_bars(2, 2, 1), 0);
        assert_eq!(total_bars(10, 0, 0), 0);
    }

    #[test]
    fn test_levels_are_chunk_peaks() {
        let samples = [0.1, -0.5, 0.2, 0.3, -0.9, 0.0, 0.7, 0.7, 0.05];
        assert_eq!(bar_levels(&samples, 3), vec![0.5, 0.9, 0.7]);
    }

    #[test]
    fn test_more_bars_than_samples() {
        assert_eq!(bar_levels(&[0.4, -0.2], 4), vec![0.4, 0.2, 0.0, 0.0]);
        assert!(bar_levels(&[0.4], 0).is_empty());
    }

    #[test]
    fn test_levels_cache_follows_bar_count() {
        let buffer = AudioBuffer::from_channels(4, vec![vec![0.1, 0.2, 0.3, 0.4]]).unwrap();
        let mut waveform = Waveform::new();
        waveform.set_buffer(&buffer);
        assert_eq!(waveform.levels(2), &[0.2, 0.4]);
        assert_eq!(waveform.levels(4), &[0.1, 0.2, 0.3, 0.4]);
        waveform.clear();
        assert!(waveform.is_empty());
        assert_eq!(waveform.levels(2), &[0.0, 0.0]);
    }
}
