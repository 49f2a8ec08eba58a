use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table, TableState};

use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SettingLine {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) modified: bool,
}

pub(crate) fn render_settings_table(
    frame: &mut Frame<'_>,
    area: Rect,
    title: Line<'_>,
    lines: &[SettingLine],
    selected: usize,
    focused: bool,
) {
    if lines.is_empty() {
        let empty = Paragraph::new("No settings loaded.").block(theme::panel(title));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["", "Key", "Value"]).style(theme::header_row(theme::SETTINGS_ACCENT));
    let rows = lines.iter().map(|line| {
        let marker = if line.modified {
            Span::styled("*", theme::unsaved())
        } else {
            Span::raw(" ")
        };
        Row::new(vec![
            Line::from(marker),
            Line::from(line.key.clone()),
            Line::from(line.value.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ],
    )
    .header(header)
    .block(theme::focus_panel(title, theme::SETTINGS_ACCENT, focused))
    .row_highlight_style(theme::selected_row(theme::SETTINGS_ACCENT));

    let mut state = TableState::default();
    state.select(Some(selected.min(lines.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}
