use crossterm::event::KeyEvent;

use crate::keymap;

/// Two-option prompt. Space toggles, Enter confirms, Esc backs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BinaryChoice {
    pub(crate) yes_selected: bool,
    yes_label: &'static str,
    no_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryChoiceEvent {
    Continue,
    ConfirmYes,
    ConfirmNo,
    Back,
}

impl BinaryChoice {
    pub(crate) fn new(default_yes: bool, yes_label: &'static str, no_label: &'static str) -> Self {
        Self {
            yes_selected: default_yes,
            yes_label,
            no_label,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> BinaryChoiceEvent {
        if keymap::is_back(key) {
            return BinaryChoiceEvent::Back;
        }

        if keymap::is_toggle(key) || keymap::is_up(key) || keymap::is_down(key) {
            self.yes_selected = !self.yes_selected;
            return BinaryChoiceEvent::Continue;
        }

        if keymap::is_confirm(key) {
            if self.yes_selected {
                BinaryChoiceEvent::ConfirmYes
            } else {
                BinaryChoiceEvent::ConfirmNo
            }
        } else {
            BinaryChoiceEvent::Continue
        }
    }

    pub(crate) fn selected_label(&self) -> &'static str {
        if self.yes_selected {
            self.yes_label
        } else {
            self.no_label
        }
    }

    pub(crate) fn options_line(&self) -> String {
        let mark = |selected: bool, label: &str| {
            if selected {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        };
        format!(
            "{}   {}",
            mark(self.yes_selected, self.yes_label),
            mark(!self.yes_selected, self.no_label)
        )
    }
}
