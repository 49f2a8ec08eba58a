use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use tunedeck_core::suggest::{Candidate, SuggestionMode};
use tui_input::Input;

use crate::theme;

pub(crate) fn render_search_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &Input,
    title: Line<'_>,
    show_cursor: bool,
) {
    let width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let paragraph = Paragraph::new(input.value())
        .scroll((0, scroll as u16))
        .block(theme::focus_panel(title, theme::SEARCH_ACCENT, show_cursor));
    frame.render_widget(paragraph, area);

    if !show_cursor || width == 0 {
        return;
    }

    let visual = input.visual_cursor();
    let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
    frame.set_cursor_position((area.x + 1 + relative as u16, area.y + 1));
}

pub(crate) fn candidate_label(
    candidate: &Candidate,
    mode: SuggestionMode,
    tag_marker: char,
) -> String {
    match mode {
        SuggestionMode::Tag => format!("{tag_marker}{}", candidate.label),
        _ => candidate.label.clone(),
    }
}

pub(crate) fn render_suggestions(
    frame: &mut Frame<'_>,
    area: Rect,
    items: &[Candidate],
    mode: SuggestionMode,
    tag_marker: char,
    selected: Option<usize>,
    fetching: bool,
) {
    let title = if fetching {
        "Suggestions (searching...)"
    } else {
        "Suggestions"
    };

    let rows: Vec<ListItem<'_>> = items
        .iter()
        .map(|candidate| ListItem::new(candidate_label(candidate, mode, tag_marker)))
        .collect();
    let list = List::new(rows)
        .block(theme::panel(title))
        .highlight_style(theme::selected_row(theme::SEARCH_ACCENT));

    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use tunedeck_core::suggest::{Candidate, SuggestionMode};

    use super::candidate_label;

    #[test]
    fn tag_candidates_render_with_marker() {
        let candidate = Candidate {
            id: None,
            label: "rock".to_string(),
        };
        assert_eq!(candidate_label(&candidate, SuggestionMode::Tag, '#'), "#rock");
        assert_eq!(candidate_label(&candidate, SuggestionMode::Tag, '+'), "+rock");
        assert_eq!(candidate_label(&candidate, SuggestionMode::Entity, '#'), "rock");
    }
}
