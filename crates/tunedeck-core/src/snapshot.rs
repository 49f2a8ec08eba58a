use std::time::{Duration, Instant};

use thiserror::Error;

use crate::change::records_equal;
use crate::record::{SettingsRecord, fill_defaults};
use crate::services::{ConfigService, ServiceError};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load settings: {0}")]
    Load(#[source] ServiceError),
    #[error("failed to save settings: {0}")]
    Save(#[source] ServiceError),
    #[error("settings have not been loaded")]
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreActivity {
    Loading,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracking {
    Idle,
    Settling { until: Instant },
    Armed,
}

/// Working buffer plus the last confirmed-saved snapshot it is diffed against.
///
/// Dirty tracking is disarmed for a settle window after every load so that
/// normalization writes made by the view right after loading do not read as edits.
/// Arming recomputes the flag, so a real edit made inside the window is still caught.
#[derive(Debug)]
pub struct SnapshotStore {
    buffer: Option<SettingsRecord>,
    snapshot: Option<SettingsRecord>,
    dirty: bool,
    tracking: Tracking,
    settle_delay: Duration,
    activity: Option<StoreActivity>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl SnapshotStore {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            buffer: None,
            snapshot: None,
            dirty: false,
            tracking: Tracking::Idle,
            settle_delay,
            activity: None,
        }
    }

    pub fn load(&mut self, service: &dyn ConfigService, now: Instant) -> Result<(), StoreError> {
        self.activity = Some(StoreActivity::Loading);
        let result = service.load();
        self.activity = None;

        let mut record = result.map_err(|error| {
            tracing::warn!(%error, "settings load failed");
            StoreError::Load(error)
        })?;
        let filled = fill_defaults(&mut record);

        self.snapshot = Some(record.clone());
        self.buffer = Some(record);
        self.dirty = false;
        self.tracking = Tracking::Settling {
            until: now + self.settle_delay,
        };
        tracing::debug!(filled, settle_ms = self.settle_delay.as_millis() as u64, "settings loaded");
        Ok(())
    }

    /// Replaces the buffer and, when tracking is armed, recomputes the dirty flag.
    pub fn update(&mut self, next: SettingsRecord, now: Instant) -> bool {
        self.buffer = Some(next);
        if !self.arm_if_due(now) && self.tracking == Tracking::Armed {
            self.recompute_dirty();
        }
        self.dirty
    }

    /// Persists the buffer. A buffer structurally equal to the snapshot is not sent,
    /// so a load followed by a save leaves the remote record untouched.
    pub fn save(&mut self, service: &dyn ConfigService) -> Result<(), StoreError> {
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(StoreError::NotLoaded);
        };

        if let Some(snapshot) = self.snapshot.as_ref()
            && records_equal(buffer, snapshot)
        {
            self.dirty = false;
            tracing::debug!("save skipped, no changes since snapshot");
            return Ok(());
        }

        self.activity = Some(StoreActivity::Saving);
        let result = service.save(buffer);
        self.activity = None;

        if let Err(error) = result {
            tracing::warn!(%error, dirty = self.dirty, "settings save failed");
            return Err(StoreError::Save(error));
        }

        self.snapshot = Some(buffer.clone());
        self.dirty = false;
        tracing::debug!("settings saved");
        Ok(())
    }

    /// Drops unsaved edits by restoring the buffer from the snapshot.
    pub fn discard_changes(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.buffer = Some(snapshot.clone());
        }
        self.dirty = false;
    }

    /// Arms tracking once the settle deadline has passed. Returns the dirty flag.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.arm_if_due(now);
        self.dirty
    }

    /// Returns whether this call armed tracking. Arming recomputes the dirty flag.
    fn arm_if_due(&mut self, now: Instant) -> bool {
        let Tracking::Settling { until } = self.tracking else {
            return false;
        };
        if now < until {
            return false;
        }

        self.tracking = Tracking::Armed;
        self.recompute_dirty();
        tracing::debug!(dirty = self.dirty, "dirty tracking armed");
        true
    }

    fn recompute_dirty(&mut self) {
        let (Some(buffer), Some(snapshot)) = (&self.buffer, &self.snapshot) else {
            return;
        };
        let dirty = !records_equal(buffer, snapshot);
        if dirty != self.dirty {
            tracing::debug!(dirty, "dirty flag changed");
        }
        self.dirty = dirty;
    }

    pub fn buffer(&self) -> Option<&SettingsRecord> {
        self.buffer.as_ref()
    }

    pub fn snapshot(&self) -> Option<&SettingsRecord> {
        self.snapshot.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_armed(&self) -> bool {
        self.tracking == Tracking::Armed
    }

    pub fn activity(&self) -> Option<StoreActivity> {
        self.activity
    }
}
