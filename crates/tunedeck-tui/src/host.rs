use std::cell::{Cell, RefCell};

use tunedeck_core::navigation::{HistoryDirection, HostRuntime, NavigationTarget, section_of};

pub(crate) const SETTINGS_SECTION: &str = "settings";

/// Location history for the terminal session. Behaves like a browser tab:
/// a user back/forward changes the location first and the view is told afterwards.
#[derive(Debug)]
pub(crate) struct TerminalHost {
    history: RefCell<Vec<String>>,
    forward: RefCell<Vec<String>>,
    last_step: Cell<Option<HistoryDirection>>,
    exit_warning: Cell<bool>,
}

impl TerminalHost {
    pub(crate) fn new(start: &str) -> Self {
        Self {
            history: RefCell::new(vec![start.to_string()]),
            forward: RefCell::new(Vec::new()),
            last_step: Cell::new(None),
            exit_warning: Cell::new(false),
        }
    }

    /// User-initiated history step. Returns false when there is nowhere to go.
    pub(crate) fn user_step(&self, direction: HistoryDirection) -> bool {
        let moved = match direction {
            HistoryDirection::Back => self.step_back(),
            HistoryDirection::Forward => self.step_forward(),
        };
        if moved {
            self.last_step.set(Some(direction));
        }
        moved
    }

    pub(crate) fn section(&self) -> String {
        section_of(&self.current_path()).to_string()
    }

    pub(crate) fn in_settings(&self) -> bool {
        self.section() == SETTINGS_SECTION
    }

    #[cfg(test)]
    pub(crate) fn exit_warning(&self) -> bool {
        self.exit_warning.get()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.history.borrow().len()
    }

    fn step_back(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.len() <= 1 {
            return false;
        }
        if let Some(path) = history.pop() {
            self.forward.borrow_mut().push(path);
        }
        true
    }

    fn step_forward(&self) -> bool {
        let Some(path) = self.forward.borrow_mut().pop() else {
            return false;
        };
        self.history.borrow_mut().push(path);
        true
    }
}

impl HostRuntime for TerminalHost {
    fn current_path(&self) -> String {
        self.history.borrow().last().cloned().unwrap_or_default()
    }

    fn go_to(&self, target: &NavigationTarget) {
        let path = target.path();
        tracing::debug!(%path, "terminal host navigated");
        self.history.borrow_mut().push(path);
        self.forward.borrow_mut().clear();
        self.last_step.set(None);
    }

    fn go_back(&self) {
        self.step_back();
    }

    fn go_forward(&self) {
        self.step_forward();
    }

    fn restore_location(&self) {
        match self.last_step.take() {
            Some(HistoryDirection::Back) => {
                self.step_forward();
            }
            Some(HistoryDirection::Forward) => {
                self.step_back();
            }
            None => {}
        }
    }

    fn set_exit_warning(&self, enabled: bool) {
        self.exit_warning.set(enabled);
    }
}
