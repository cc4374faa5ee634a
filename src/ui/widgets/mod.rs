// src/ui/widgets/mod.rs
//! Custom widgets for the studio UI.

pub mod editor;
pub mod player_panel;
pub mod settings_panel;
pub mod voice_list;
pub mod waveform;

// Re-export widget rendering functions
pub use editor::render_editor;
pub use player_panel::{render_player_panel, PlayerView};
pub use settings_panel::render_settings_panel;
pub use voice_list::render_voice_list;
pub use waveform::render_waveform;
