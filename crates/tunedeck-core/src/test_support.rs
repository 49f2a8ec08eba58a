use std::cell::RefCell;
use std::sync::Mutex;

use crate::navigation::{HostRuntime, NavigationTarget};
use crate::record::SettingsRecord;
use crate::services::{ConfigService, ServiceError};

#[derive(Default)]
pub struct ScriptedConfigService {
    remote: Mutex<SettingsRecord>,
    saved: Mutex<Vec<SettingsRecord>>,
    load_failure: Mutex<Option<String>>,
    save_failure: Mutex<Option<String>>,
}

impl ScriptedConfigService {
    pub fn new(remote: SettingsRecord) -> Self {
        Self {
            remote: Mutex::new(remote),
            ..Self::default()
        }
    }

    pub fn remote(&self) -> SettingsRecord {
        self.remote.lock().expect("remote lock").clone()
    }

    pub fn saved(&self) -> Vec<SettingsRecord> {
        self.saved.lock().expect("saved lock").clone()
    }

    pub fn fail_next_load(&self, message: &str) {
        *self.load_failure.lock().expect("load failure lock") = Some(message.to_string());
    }

    pub fn fail_next_save(&self, message: &str) {
        *self.save_failure.lock().expect("save failure lock") = Some(message.to_string());
    }
}

impl ConfigService for ScriptedConfigService {
    fn load(&self) -> Result<SettingsRecord, ServiceError> {
        if let Some(message) = self.load_failure.lock().expect("load failure lock").take() {
            return Err(ServiceError::Network { message });
        }
        Ok(self.remote())
    }

    fn save(&self, record: &SettingsRecord) -> Result<(), ServiceError> {
        if let Some(message) = self.save_failure.lock().expect("save failure lock").take() {
            return Err(ServiceError::Validation { message });
        }
        *self.remote.lock().expect("remote lock") = record.clone();
        self.saved.lock().expect("saved lock").push(record.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    GoTo(String),
    GoBack,
    GoForward,
    RestoreLocation,
    ExitWarning(bool),
}

pub struct RecordingHost {
    path: RefCell<String>,
    calls: RefCell<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn at(path: &str) -> Self {
        Self {
            path: RefCell::new(path.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn navigation_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, HostCall::ExitWarning(_)))
            .collect()
    }
}

impl HostRuntime for RecordingHost {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn go_to(&self, target: &NavigationTarget) {
        let path = target.path();
        *self.path.borrow_mut() = path.clone();
        self.calls.borrow_mut().push(HostCall::GoTo(path));
    }

    fn go_back(&self) {
        self.calls.borrow_mut().push(HostCall::GoBack);
    }

    fn go_forward(&self) {
        self.calls.borrow_mut().push(HostCall::GoForward);
    }

    fn restore_location(&self) {
        self.calls.borrow_mut().push(HostCall::RestoreLocation);
    }

    fn set_exit_warning(&self, enabled: bool) {
        self.calls.borrow_mut().push(HostCall::ExitWarning(enabled));
    }
}
