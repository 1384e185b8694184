use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Refresh,
    NextField,
    PrevField,
    Left,
    Right,
    Up,
    Down,
    Backspace,
    Clear,
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('r') => AppAction::Refresh,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => AppAction::Quit,
        KeyCode::Char('r') | KeyCode::F(5) => AppAction::Refresh,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::BackTab => AppAction::PrevField,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Delete => AppAction::Clear,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}
