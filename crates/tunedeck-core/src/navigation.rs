use crate::services::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Tag,
    Keyword,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Keyword => "keyword",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub text: String,
    pub kind: SearchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Path(String),
    Entity { id: EntityId, name_hint: String },
    Search(SearchRequest),
}

impl NavigationTarget {
    pub fn path(&self) -> String {
        match self {
            Self::Path(path) => path.clone(),
            Self::Entity { id, .. } => format!("/artists/{id}"),
            Self::Search(request) => format!("/search/{}/{}", request.kind.as_str(), request.text),
        }
    }
}

/// First path segment, used to decide whether a link leaves the current view.
pub fn section_of(path: &str) -> &str {
    path.trim_start_matches('/')
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
}

/// Host-side navigation and exit-warning surface the interceptor drives.
pub trait HostRuntime {
    fn current_path(&self) -> String;
    fn go_to(&self, target: &NavigationTarget);
    fn go_back(&self);
    fn go_forward(&self);
    /// Re-establishes the location that was current before a history pop.
    fn restore_location(&self);
    fn set_exit_warning(&self, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Back,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingNavigation {
    Navigate(NavigationTarget),
    GoBack,
    GoForward,
}

impl From<HistoryDirection> for PendingNavigation {
    fn from(direction: HistoryDirection) -> Self {
        match direction {
            HistoryDirection::Back => Self::GoBack,
            HistoryDirection::Forward => Self::GoForward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Clean,
    Dirty,
    ConfirmPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    Proceed,
    Suppressed,
}

/// Gates every exit from the editor view while it holds unsaved edits.
///
/// One instance belongs to one mounted editor view. Intercepts (the host exit
/// warning) are installed only while the state is `Dirty` or `ConfirmPending`
/// and are removed on `teardown`.
#[derive(Debug, Default)]
pub struct NavigationInterceptor {
    state: GuardState,
    pending: Option<PendingNavigation>,
    installed: bool,
}

impl NavigationInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    pub fn confirm_visible(&self) -> bool {
        self.state == GuardState::ConfirmPending
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Follows the store's dirty flag. Ignored while a confirmation is open.
    pub fn sync_dirty(&mut self, dirty: bool, host: &dyn HostRuntime) {
        match (self.state, dirty) {
            (GuardState::Clean, true) => {
                self.state = GuardState::Dirty;
                self.install(host);
            }
            (GuardState::Dirty, false) => {
                self.state = GuardState::Clean;
                self.uninstall(host);
            }
            _ => {}
        }
    }

    /// Decides a link activation before the host acts on it.
    pub fn on_link_activation(
        &mut self,
        target: NavigationTarget,
        host: &dyn HostRuntime,
    ) -> LinkDecision {
        match self.state {
            GuardState::Clean => LinkDecision::Proceed,
            GuardState::ConfirmPending => LinkDecision::Suppressed,
            GuardState::Dirty => {
                let current = host.current_path();
                if section_of(&target.path()) == section_of(&current) {
                    return LinkDecision::Proceed;
                }

                tracing::debug!(path = %target.path(), "link suppressed by unsaved changes");
                self.pending = Some(PendingNavigation::Navigate(target));
                self.state = GuardState::ConfirmPending;
                LinkDecision::Suppressed
            }
        }
    }

    /// Reacts to a history pop that already moved the host. Returns whether it was intercepted.
    pub fn on_history_pop(&mut self, direction: HistoryDirection, host: &dyn HostRuntime) -> bool {
        match self.state {
            GuardState::Clean => false,
            GuardState::Dirty => {
                host.restore_location();
                tracing::debug!(?direction, "history pop neutralized by unsaved changes");
                self.pending = Some(direction.into());
                self.state = GuardState::ConfirmPending;
                true
            }
            GuardState::ConfirmPending => {
                host.restore_location();
                true
            }
        }
    }

    /// Whether a close/quit should be warned about. Best effort only.
    pub fn on_before_unload(&self) -> bool {
        self.installed
    }

    /// Accepts losing the edits: returns to `Clean` and replays the pending navigation.
    pub fn confirm(&mut self, host: &dyn HostRuntime) -> Option<PendingNavigation> {
        if self.state != GuardState::ConfirmPending {
            return None;
        }

        let pending = self.pending.take();
        self.state = GuardState::Clean;
        self.uninstall(host);

        match &pending {
            Some(PendingNavigation::Navigate(target)) => host.go_to(target),
            Some(PendingNavigation::GoBack) => host.go_back(),
            Some(PendingNavigation::GoForward) => host.go_forward(),
            None => {}
        }
        tracing::debug!(?pending, "navigation confirmed");
        pending
    }

    pub fn cancel(&mut self) -> bool {
        if self.state != GuardState::ConfirmPending {
            return false;
        }

        self.pending = None;
        self.state = GuardState::Dirty;
        true
    }

    pub fn teardown(&mut self, host: &dyn HostRuntime) {
        self.pending = None;
        self.state = GuardState::Clean;
        self.uninstall(host);
    }

    fn install(&mut self, host: &dyn HostRuntime) {
        if !self.installed {
            host.set_exit_warning(true);
            self.installed = true;
        }
    }

    fn uninstall(&mut self, host: &dyn HostRuntime) {
        if self.installed {
            host.set_exit_warning(false);
            self.installed = false;
        }
    }
}
