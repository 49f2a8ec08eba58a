use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

pub(crate) const SETTINGS_ACCENT: Color = Color::Cyan;
pub(crate) const SEARCH_ACCENT: Color = Color::Magenta;

pub(crate) fn panel<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Panel whose border takes the accent color while it owns keyboard focus.
pub(crate) fn focus_panel<'a>(
    title: impl Into<Line<'a>>,
    accent: Color,
    focused: bool,
) -> Block<'a> {
    let border = if focused {
        Style::default().fg(accent)
    } else {
        muted()
    };
    panel(title).border_style(border)
}

pub(crate) fn keys_panel() -> Block<'static> {
    panel("Keys")
}

pub(crate) fn header_row(accent: Color) -> Style {
    Style::default().fg(accent).add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_row(accent: Color) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(accent)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn prompt() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
}

pub(crate) fn saved() -> Style {
    Style::default().fg(Color::Green)
}

pub(crate) fn failure() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub(crate) fn unsaved() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn muted() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}
