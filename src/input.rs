//! Key bindings: arrows, vim-style and WASD.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use geojewels::Intent;

/// Action from a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    /// Held for fast fall; released to stop.
    Drop,
    Pause,
    Restart,
    Start,
    Quit,
    None,
}

/// Map key event to action. Supports arrows, vim (hjkl) and WASD.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Enter => Action::Start,
        KeyCode::Left | KeyCode::Char('h' | 'a') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l' | 'd') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k' | 'w' | ' ') => Action::Rotate,
        KeyCode::Down | KeyCode::Char('j' | 's') => Action::Drop,
        _ => Action::None,
    }
}

/// Session intent for an action and key event kind. Moves follow key repeat; the drop key
/// maps press and release onto fast fall on and off.
pub fn to_intent(action: Action, kind: KeyEventKind) -> Option<Intent> {
    let pressed = kind == KeyEventKind::Press;
    let held = pressed || kind == KeyEventKind::Repeat;
    match action {
        Action::MoveLeft if held => Some(Intent::MoveLeft),
        Action::MoveRight if held => Some(Intent::MoveRight),
        Action::Rotate if pressed => Some(Intent::Rotate),
        Action::Drop if held => Some(Intent::FastFallOn),
        Action::Drop if kind == KeyEventKind::Release => Some(Intent::FastFallOff),
        Action::Pause if pressed => Some(Intent::TogglePause),
        Action::Restart if pressed => Some(Intent::Restart),
        Action::Start if pressed => Some(Intent::Start),
        _ => None,
    }
}
