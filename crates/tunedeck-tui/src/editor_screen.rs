use std::time::Instant;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Clear;
use serde_json::Value;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tunedeck_app::{App, EditorNotice, EditorSession, SearchBox, render_value};
use tunedeck_core::navigation::{HistoryDirection, HostRuntime, NavigationTarget};
use tunedeck_core::suggest::SuggestionKey;

use crate::host::TerminalHost;
use crate::keymap;
use crate::theme;
use crate::ui::binary_choice::{BinaryChoice, BinaryChoiceEvent};
use crate::ui::modal::render_prompt_modal;
use crate::ui::settings_table::{SettingLine, render_settings_table};
use crate::ui::suggestions::{render_search_input, render_suggestions};
use crate::ui::text::{
    compact_hint, focus_line, key_hint_height, key_hint_paragraph, label_value_line,
    wrapped_paragraph,
};
use crate::{UiExit, centered_rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Edit,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowSignal {
    Continue,
    Exit(UiExit),
}

fn leave_choice() -> BinaryChoice {
    BinaryChoice::new(false, "Discard", "Stay")
}

fn quit_choice() -> BinaryChoice {
    BinaryChoice::new(false, "Quit", "Stay")
}

/// Parses edited text into the JSON type of the value it replaces.
pub(crate) fn parse_input_value(raw: &str, previous: Option<&Value>) -> Value {
    match previous {
        None | Some(Value::String(_)) => Value::String(raw.to_string()),
        Some(_) => serde_json::from_str(raw.trim())
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

pub(crate) struct EditorScreen {
    host: TerminalHost,
    session: EditorSession,
    mounted: bool,
    search: SearchBox,
    search_input: Input,
    tag_marker: char,
    edit_input: Input,
    editing_key: Option<String>,
    focus: Focus,
    selected: usize,
    leave_choice: BinaryChoice,
    quit_choice: Option<BinaryChoice>,
    status: Option<String>,
}

impl EditorScreen {
    pub(crate) fn new(app: &App<'_>, now: Instant) -> Result<Self> {
        let host = TerminalHost::new("/settings");
        let mut session = app.new_editor();
        session.mount(app.settings, &host, now)?;

        Ok(Self {
            host,
            session,
            mounted: true,
            search: app.new_search_box(),
            search_input: Input::default(),
            tag_marker: app.config.search.tag_marker,
            edit_input: Input::default(),
            editing_key: None,
            focus: Focus::List,
            selected: 0,
            leave_choice: leave_choice(),
            quit_choice: None,
            status: None,
        })
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.session.on_tick(now, &self.host);
        self.search.on_tick(now);
    }

    pub(crate) fn on_key(
        &mut self,
        key: KeyEvent,
        app: &App<'_>,
        now: Instant,
    ) -> Result<Option<UiExit>> {
        match self.handle_key(key, app, now)? {
            FlowSignal::Continue => Ok(None),
            FlowSignal::Exit(exit) => Ok(Some(exit)),
        }
    }

    /// Teardown on exit: drops in-flight fetches and the exit warning.
    pub(crate) fn close(&mut self) {
        self.search.teardown();
        if self.mounted {
            self.session.unmount(&self.host);
            self.mounted = false;
        }
    }

    fn handle_key(&mut self, key: KeyEvent, app: &App<'_>, now: Instant) -> Result<FlowSignal> {
        if self.session.confirm_visible() {
            self.on_leave_prompt_key(key, app, now)?;
            return Ok(FlowSignal::Continue);
        }

        if let Some(choice) = self.quit_choice.as_mut() {
            match choice.on_key(key) {
                BinaryChoiceEvent::ConfirmYes => return Ok(FlowSignal::Exit(UiExit::Completed)),
                BinaryChoiceEvent::ConfirmNo | BinaryChoiceEvent::Back => self.quit_choice = None,
                BinaryChoiceEvent::Continue => {}
            }
            return Ok(FlowSignal::Continue);
        }

        match self.focus {
            Focus::List => self.on_list_key(key, app, now),
            Focus::Edit => {
                self.on_edit_key(key, now)?;
                Ok(FlowSignal::Continue)
            }
            Focus::Search => {
                self.on_search_key(key, app, now)?;
                Ok(FlowSignal::Continue)
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent, app: &App<'_>, now: Instant) -> Result<FlowSignal> {
        if keymap::is_quit(key) || keymap::is_back(key) {
            if self.mounted && self.session.before_unload() {
                self.quit_choice = Some(quit_choice());
                return Ok(FlowSignal::Continue);
            }
            return Ok(FlowSignal::Exit(UiExit::Completed));
        }

        if keymap::is_search_focus(key) || keymap::is_focus_switch(key) {
            self.focus = Focus::Search;
            return Ok(FlowSignal::Continue);
        }

        if let Some(path) = keymap::section_shortcut(key) {
            self.navigate(NavigationTarget::Path(path.to_string()), app, now)?;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_history_back(key) {
            self.history_step(HistoryDirection::Back, app, now)?;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_history_forward(key) {
            self.history_step(HistoryDirection::Forward, app, now)?;
            return Ok(FlowSignal::Continue);
        }

        if !self.mounted {
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_up(key) {
            self.selected = self.selected.saturating_sub(1);
        } else if keymap::is_down(key) {
            if self.selected + 1 < self.setting_lines().len() {
                self.selected += 1;
            }
        } else if keymap::is_confirm(key) {
            self.begin_edit();
        } else if keymap::is_save(key) {
            self.session.save(app.settings, &self.host)?;
            self.status = Some("Settings saved.".to_string());
        }

        Ok(FlowSignal::Continue)
    }

    fn on_edit_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        if keymap::is_back(key) {
            self.finish_edit();
            return Ok(());
        }

        if keymap::is_confirm(key) {
            if let Some(path) = self.editing_key.clone() {
                let previous = self.session.buffer().and_then(|buffer| buffer.get(&path));
                let value = parse_input_value(self.edit_input.value(), previous);
                self.session.set_value(&path, value, &self.host, now)?;
            }
            self.finish_edit();
            return Ok(());
        }

        self.edit_input.handle_event(&Event::Key(key));
        Ok(())
    }

    fn on_search_key(&mut self, key: KeyEvent, app: &App<'_>, now: Instant) -> Result<()> {
        if keymap::is_back(key) {
            self.search.on_key(SuggestionKey::Escape);
            self.focus = Focus::List;
            return Ok(());
        }

        if keymap::is_focus_switch(key) {
            self.search.on_key(SuggestionKey::Blur);
            self.focus = Focus::List;
            return Ok(());
        }

        if keymap::is_arrow_up(key) {
            self.search.on_key(SuggestionKey::Up);
            return Ok(());
        }

        if keymap::is_arrow_down(key) {
            self.search.on_key(SuggestionKey::Down);
            return Ok(());
        }

        if keymap::is_confirm(key) {
            if let Some(target) = self.search.on_key(SuggestionKey::Enter) {
                self.search_input = Input::default();
                self.focus = Focus::List;
                self.navigate(target, app, now)?;
            }
            return Ok(());
        }

        if self.search_input.handle_event(&Event::Key(key)).is_some() {
            self.search.set_query(self.search_input.value(), now);
        }
        Ok(())
    }

    fn on_leave_prompt_key(&mut self, key: KeyEvent, app: &App<'_>, now: Instant) -> Result<()> {
        match self.leave_choice.on_key(key) {
            BinaryChoiceEvent::ConfirmYes => {
                self.leave_choice = leave_choice();
                self.session.confirm_leave(&self.host);
                self.sync_mount(app, now)?;
            }
            BinaryChoiceEvent::ConfirmNo | BinaryChoiceEvent::Back => {
                self.leave_choice = leave_choice();
                self.session.cancel_leave();
            }
            BinaryChoiceEvent::Continue => {}
        }
        Ok(())
    }

    fn navigate(&mut self, target: NavigationTarget, app: &App<'_>, now: Instant) -> Result<()> {
        if self.mounted {
            self.session.follow_link(target, &self.host);
        } else {
            self.host.go_to(&target);
        }
        self.sync_mount(app, now)
    }

    fn history_step(
        &mut self,
        direction: HistoryDirection,
        app: &App<'_>,
        now: Instant,
    ) -> Result<()> {
        if !self.host.user_step(direction) {
            let edge = match direction {
                HistoryDirection::Back => "first",
                HistoryDirection::Forward => "last",
            };
            self.status = Some(format!("Already at the {edge} location."));
            return Ok(());
        }

        if self.mounted && self.session.history_pop(direction, &self.host) {
            return Ok(());
        }
        self.sync_mount(app, now)
    }

    /// Mounts the editor on entering the settings section and unmounts on leaving it.
    fn sync_mount(&mut self, app: &App<'_>, now: Instant) -> Result<()> {
        let in_settings = self.host.in_settings();
        if in_settings && !self.mounted {
            self.session = app.new_editor();
            self.session.mount(app.settings, &self.host, now)?;
            self.mounted = true;
            self.selected = 0;
        } else if !in_settings && self.mounted {
            self.session.unmount(&self.host);
            self.mounted = false;
            self.finish_edit();
        }
        Ok(())
    }

    fn begin_edit(&mut self) {
        let Some(line) = self.setting_lines().into_iter().nth(self.selected) else {
            return;
        };
        self.edit_input = Input::new(line.value);
        self.editing_key = Some(line.key);
        self.focus = Focus::Edit;
    }

    fn finish_edit(&mut self) {
        self.editing_key = None;
        self.edit_input = Input::default();
        if self.focus == Focus::Edit {
            self.focus = Focus::List;
        }
    }

    fn setting_lines(&self) -> Vec<SettingLine> {
        let Some(buffer) = self.session.buffer() else {
            return Vec::new();
        };
        let modified = self.session.changed_paths();

        buffer
            .flatten()
            .into_iter()
            .map(|(key, value)| SettingLine {
                modified: modified.contains(&key),
                value: render_value(&value),
                key,
            })
            .collect()
    }

    fn status_line(&self) -> Line<'static> {
        if self.mounted && self.session.is_dirty() {
            return Line::from(Span::styled(
                "Unsaved changes (s: save)",
                theme::unsaved(),
            ));
        }

        match self.session.notice() {
            Some(EditorNotice::SaveFailed(message)) | Some(EditorNotice::LoadFailed(message)) => {
                Line::from(Span::styled(message.clone(), theme::failure()))
            }
            Some(EditorNotice::Saved) => {
                Line::from(Span::styled("All changes saved", theme::saved()))
            }
            Some(EditorNotice::Discarded) => {
                Line::from(Span::styled("Unsaved changes discarded", theme::muted()))
            }
            None => match &self.status {
                Some(status) => focus_line(status.clone()),
                None => Line::from(""),
            },
        }
    }

    fn key_hint(&self, width: u16) -> &'static str {
        match self.focus {
            Focus::Edit => compact_hint(
                width,
                "Enter: apply value    Esc: cancel edit",
                "Enter: apply    Esc: cancel",
                "Enter apply | Esc cancel",
            ),
            Focus::Search => compact_hint(
                width,
                "Type to search (#tag or artist)    Up/Down: highlight    Enter: open    Esc/Tab: leave search",
                "Up/Down: highlight    Enter: open    Esc/Tab: leave",
                "Up/Down | Enter open | Esc leave",
            ),
            Focus::List => compact_hint(
                width,
                "Enter: edit    s: save    /: search    1/2/3: settings/library/playlists    b/f: back/forward    q: quit",
                "Enter: edit    s: save    /: search    1/2/3: go    b: back    q: quit",
                "Enter edit | s save | / search | b back | q quit",
            ),
        }
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let key_text = self.key_hint(area.width);
        let footer_height = key_hint_height(area.width, key_text);
        let [header, search, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            label_value_line("location", self.host.current_path()),
            self.status_line(),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::panel("tunedeck")),
            header,
        );

        let search_title = if self.focus == Focus::Search {
            focus_line("Search")
        } else {
            Line::from("Search (/)")
        };
        render_search_input(
            frame,
            search,
            &self.search_input,
            search_title,
            self.focus == Focus::Search,
        );

        let [main, side] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .areas(body);

        if self.mounted {
            let title = if self.focus == Focus::List {
                focus_line("Settings")
            } else {
                Line::from("Settings")
            };
            render_settings_table(
                frame,
                main,
                title,
                &self.setting_lines(),
                self.selected,
                self.focus == Focus::List,
            );
        } else {
            let text = Text::from(vec![
                Line::from(format!("Viewing {}", self.host.current_path())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press 1 for settings or b to go back.",
                    theme::muted(),
                )),
            ]);
            frame.render_widget(
                wrapped_paragraph(text).block(theme::panel(self.host.section())),
                main,
            );
        }

        render_suggestions(
            frame,
            side,
            self.search.items(),
            self.search.mode(),
            self.tag_marker,
            self.search.selected(),
            self.search.is_fetching(),
        );

        frame.render_widget(key_hint_paragraph(key_text).block(theme::keys_panel()), footer);

        if self.focus == Focus::Edit {
            let title = self.editing_key.clone().unwrap_or_default();
            let mut edit_area = centered_rect(60, 20, area);
            edit_area.height = edit_area.height.min(3);
            frame.render_widget(Clear, edit_area);
            render_search_input(frame, edit_area, &self.edit_input, focus_line(title), true);
        }

        if self.session.confirm_visible() {
            render_prompt_modal(
                frame,
                "Unsaved changes",
                "Leave this view? Unsaved edits will be discarded.",
                self.leave_choice.options_line(),
                "Space: toggle    Enter: choose    Esc: stay",
            );
        } else if let Some(choice) = &self.quit_choice {
            render_prompt_modal(
                frame,
                "Unsaved changes",
                "Quit tunedeck? Unsaved edits will be lost.",
                choice.options_line(),
                "Space: toggle    Enter: choose    Esc: stay",
            );
        }
    }
}
