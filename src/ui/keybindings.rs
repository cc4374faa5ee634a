// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which panel receives plain character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Typing goes into the text editor.
    #[default]
    Editor,
    /// Keys drive the player.
    Controls,
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Insert(char),
    Newline,
    Backspace,
    FocusEditor,
    FocusControls,
    TogglePlay,
    Generate,
    /// -1 back, +1 forward
    Skip(i8),
    SeekStart,
    SeekEnd,
    /// Jump to n tenths of the clip
    Scrub(u8),
    Speed(i8),
    Pitch(i8),
    Voice(i8),
    CycleTheme,
    ToggleMode,
    Clear,
    Quit,
    None,
}

/// Map digit keys to a scrub position in tenths (0..=9).
pub fn map_key_to_digit(key: &KeyEvent) -> Option<u8> {
    match key.code {
        KeyCode::Char(c) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// Convert a key event to an action for the focused panel.
pub fn key_to_action(key: &KeyEvent, focus: Focus) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('g') | KeyCode::Enter => Action::Generate,
            _ => Action::None,
        };
    }

    match focus {
        Focus::Editor => editor_action(key),
        Focus::Controls => control_action(key),
    }
}

fn editor_action(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Enter => Action::Newline,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Esc | KeyCode::Tab => Action::FocusControls,
        _ => Action::None,
    }
}

fn control_action(key: &KeyEvent) -> Action {
    if let Some(d) = map_key_to_digit(key) {
        return Action::Scrub(d);
    }

    match key.code {
        KeyCode::Tab | KeyCode::Char('e') => Action::FocusEditor,
        KeyCode::Char(' ') => Action::TogglePlay,
        KeyCode::Char('g') | KeyCode::Enter => Action::Generate,
        KeyCode::Left => Action::Skip(-1),
        KeyCode::Right => Action::Skip(1),
        KeyCode::Home => Action::SeekStart,
        KeyCode::End => Action::SeekEnd,
        KeyCode::Char('[') => Action::Speed(-1),
        KeyCode::Char(']') => Action::Speed(1),
        KeyCode::Char('-') => Action::Pitch(-1),
        KeyCode::Char('=') | KeyCode::Char('+') => Action::Pitch(1),
        KeyCode::Up => Action::Voice(-1),
        KeyCode::Down => Action::Voice(1),
        KeyCode::Char('t') => Action::CycleTheme,
        KeyCode::Char('m') => Action::ToggleMode,
        KeyCode::Char('c') => Action::Clear,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editor_captures_characters() {
        assert_eq!(key_to_action(&press(KeyCode::Char('q')), Focus::Editor), Action::Insert('q'));
        assert_eq!(key_to_action(&press(KeyCode::Char(' ')), Focus::Editor), Action::Insert(' '));
        assert_eq!(key_to_action(&press(KeyCode::Enter), Focus::Editor), Action::Newline);
        assert_eq!(key_to_action(&press(KeyCode::Tab), Focus::Editor), Action::FocusControls);
    }

    #[test]
    fn test_control_keys() {
        let c = Focus::Controls;
        assert_eq!(key_to_action(&press(KeyCode::Char(' ')), c), Action::TogglePlay);
        assert_eq!(key_to_action(&press(KeyCode::Left), c), Action::Skip(-1));
        assert_eq!(key_to_action(&press(KeyCode::Char('7')), c), Action::Scrub(7));
        assert_eq!(key_to_action(&press(KeyCode::Char(']')), c), Action::Speed(1));
        assert_eq!(key_to_action(&press(KeyCode::Char('-')), c), Action::Pitch(-1));
        assert_eq!(key_to_action(&press(KeyCode::Char('q')), c), Action::Quit);
        assert_eq!(key_to_action(&press(KeyCode::Tab), c), Action::FocusEditor);
    }

    #[test]
    fn test_ctrl_c_quits_from_editor() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&key, Focus::Editor), Action::Quit);
    }
}
