use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::state::ViewMode;
use crate::signal::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Select,
    Back,
    ToggleSort,
    Refresh,
    RequestKill(SignalKind),
    ConfirmKill,
    CancelKill,
}

/// Map a key event to an action based on the current view mode and search state.
pub fn map_key_to_action(key: KeyEvent, mode: ViewMode, search_empty: bool) -> Option<Action> {
    // Only handle key press events to avoid duplicate events
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match mode {
        ViewMode::List => map_list_key(key, search_empty),
        ViewMode::Detail => map_detail_key(key),
        ViewMode::Confirm => map_confirm_key(key),
    }
}

fn map_list_key(key: KeyEvent, search_empty: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('u') => Some(Action::SearchClear),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => {
            if search_empty {
                Some(Action::Quit)
            } else {
                Some(Action::SearchClear)
            }
        }
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::F(5) => Some(Action::Refresh),
        // Single-letter commands only while no query is being typed.
        KeyCode::Char('k') if search_empty => Some(Action::MoveUp),
        KeyCode::Char('j') if search_empty => Some(Action::MoveDown),
        KeyCode::Char('q') if search_empty => Some(Action::Quit),
        KeyCode::Char('s') if search_empty => Some(Action::ToggleSort),
        KeyCode::Char('r') if search_empty => Some(Action::Refresh),
        KeyCode::Char('x') if search_empty => Some(Action::RequestKill(SignalKind::Terminate)),
        KeyCode::Char('X') if search_empty => Some(Action::RequestKill(SignalKind::Kill)),
        KeyCode::Char(c) => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn map_detail_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::F(5) | KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('x') => Some(Action::RequestKill(SignalKind::Terminate)),
        KeyCode::Char('X') => Some(Action::RequestKill(SignalKind::Kill)),
        _ => None,
    }
}

fn map_confirm_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmKill),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CancelKill),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::CancelKill)
        }
        _ => None,
    }
}
