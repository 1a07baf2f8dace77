//! Key bindings: arrows, vim-style and WASD.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    ShiftLeft,
    ShiftRight,
    Confirm,
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Supports arrows, vim (hjkl) and WASD.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod && modifiers != KeyModifiers::CONTROL {
        return Action::None;
    }
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char(' ') if modifiers == KeyModifiers::CONTROL => Action::Pause,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') if no_mod => Action::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') if no_mod => Action::Restart,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') if no_mod => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') if no_mod => Action::CursorDown,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') if no_mod => Action::ShiftLeft,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') if no_mod => Action::ShiftRight,
        KeyCode::Enter | KeyCode::Char(' ') if no_mod => Action::Confirm,
        _ => Action::None,
    }
}
