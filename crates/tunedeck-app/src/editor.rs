use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;
use tunedeck_core::change::changed_paths;
use tunedeck_core::navigation::{
    GuardState, HistoryDirection, HostRuntime, LinkDecision, NavigationInterceptor,
    NavigationTarget, PendingNavigation,
};
use tunedeck_core::record::SettingsRecord;
use tunedeck_core::services::ConfigService;
use tunedeck_core::snapshot::{SnapshotStore, StoreActivity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorNotice {
    Saved,
    SaveFailed(String),
    LoadFailed(String),
    Discarded,
}

/// One mounted settings view: the snapshot store plus the interceptor guarding its exits.
#[derive(Debug)]
pub struct EditorSession {
    store: SnapshotStore,
    guard: NavigationInterceptor,
    mounted: bool,
    notice: Option<EditorNotice>,
}

impl EditorSession {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            store: SnapshotStore::new(settle_delay),
            guard: NavigationInterceptor::new(),
            mounted: false,
            notice: None,
        }
    }

    pub fn mount(
        &mut self,
        service: &dyn ConfigService,
        host: &dyn HostRuntime,
        now: Instant,
    ) -> Result<()> {
        if let Err(error) = self.store.load(service, now) {
            self.notice = Some(EditorNotice::LoadFailed(error.to_string()));
            return Err(error).context("failed to load settings for editor");
        }

        self.mounted = true;
        self.guard.sync_dirty(self.store.is_dirty(), host);
        Ok(())
    }

    pub fn update(&mut self, next: SettingsRecord, host: &dyn HostRuntime, now: Instant) -> bool {
        let dirty = self.store.update(next, now);
        self.guard.sync_dirty(dirty, host);
        dirty
    }

    /// Writes one dotted path into a copy of the buffer and feeds it back through `update`.
    pub fn set_value(
        &mut self,
        path: &str,
        value: Value,
        host: &dyn HostRuntime,
        now: Instant,
    ) -> Result<bool> {
        let buffer = self
            .store
            .buffer()
            .context("settings are not loaded yet")?;
        let next = buffer
            .with_value(path, value)
            .with_context(|| format!("failed to set '{path}'"))?;
        Ok(self.update(next, host, now))
    }

    pub fn save(&mut self, service: &dyn ConfigService, host: &dyn HostRuntime) -> Result<()> {
        match self.store.save(service) {
            Ok(()) => {
                self.guard.sync_dirty(false, host);
                self.notice = Some(EditorNotice::Saved);
                Ok(())
            }
            Err(error) => {
                self.notice = Some(EditorNotice::SaveFailed(error.to_string()));
                Err(error).context("failed to save settings")
            }
        }
    }

    /// Navigates immediately unless the interceptor holds the link for confirmation.
    pub fn follow_link(&mut self, target: NavigationTarget, host: &dyn HostRuntime) -> LinkDecision {
        let decision = self.guard.on_link_activation(target.clone(), host);
        if decision == LinkDecision::Proceed {
            host.go_to(&target);
        }
        decision
    }

    pub fn history_pop(&mut self, direction: HistoryDirection, host: &dyn HostRuntime) -> bool {
        self.guard.on_history_pop(direction, host)
    }

    /// Drops the unsaved edits and replays the held navigation.
    pub fn confirm_leave(&mut self, host: &dyn HostRuntime) -> Option<PendingNavigation> {
        if !self.guard.confirm_visible() {
            return None;
        }

        self.store.discard_changes();
        self.notice = Some(EditorNotice::Discarded);
        self.guard.confirm(host)
    }

    pub fn cancel_leave(&mut self) -> bool {
        self.guard.cancel()
    }

    /// Arms dirty tracking when the settle window ends and lets the guard follow the result.
    pub fn on_tick(&mut self, now: Instant, host: &dyn HostRuntime) {
        let dirty = self.store.on_tick(now);
        if self.mounted {
            self.guard.sync_dirty(dirty, host);
        }
    }

    pub fn before_unload(&self) -> bool {
        self.guard.on_before_unload()
    }

    pub fn unmount(&mut self, host: &dyn HostRuntime) {
        self.mounted = false;
        self.guard.teardown(host);
    }

    pub fn buffer(&self) -> Option<&SettingsRecord> {
        self.store.buffer()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_armed(&self) -> bool {
        self.store.is_armed()
    }

    pub fn activity(&self) -> Option<StoreActivity> {
        self.store.activity()
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    pub fn confirm_visible(&self) -> bool {
        self.guard.confirm_visible()
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.guard.pending()
    }

    pub fn notice(&self) -> Option<&EditorNotice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<EditorNotice> {
        self.notice.take()
    }

    /// Paths edited since the last load or save.
    pub fn changed_paths(&self) -> Vec<String> {
        match (self.store.snapshot(), self.store.buffer()) {
            (Some(snapshot), Some(buffer)) => changed_paths(snapshot, buffer),
            _ => Vec::new(),
        }
    }
}
