use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
}

pub(crate) fn is_save(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('s'))
}

pub(crate) fn is_history_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Backspace | KeyCode::Char('b'))
}

pub(crate) fn is_history_forward(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('f'))
}

pub(crate) fn is_search_focus(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('/'))
}

pub(crate) fn is_focus_switch(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab)
}

/// Arrow-only movement for places where letters are typed text.
pub(crate) fn is_arrow_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up)
}

pub(crate) fn is_arrow_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down)
}

pub(crate) fn section_shortcut(key: KeyEvent) -> Option<&'static str> {
    if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
        return None;
    }
    match key.code {
        KeyCode::Char('1') => Some("/settings"),
        KeyCode::Char('2') => Some("/library"),
        KeyCode::Char('3') => Some("/playlists"),
        _ => None,
    }
}
