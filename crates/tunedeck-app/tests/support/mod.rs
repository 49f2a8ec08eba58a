#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use tunedeck_app::SuggestionFetcher;
use tunedeck_core::navigation::{HistoryDirection, HostRuntime, NavigationTarget};
use tunedeck_core::record::SettingsRecord;
use tunedeck_core::services::{ConfigService, EntityHit, ServiceError, SuggestionService};
use tunedeck_core::suggest::{FetchPayload, FetchResponse, FetchTicket};

#[derive(Default)]
pub struct ScriptedSettings {
    remote: Mutex<SettingsRecord>,
    saves: Mutex<Vec<SettingsRecord>>,
    fail_save: Mutex<Option<String>>,
}

impl ScriptedSettings {
    pub fn new(remote: SettingsRecord) -> Self {
        Self {
            remote: Mutex::new(remote),
            ..Self::default()
        }
    }

    pub fn remote(&self) -> SettingsRecord {
        self.remote.lock().expect("remote lock").clone()
    }

    pub fn saves(&self) -> Vec<SettingsRecord> {
        self.saves.lock().expect("saves lock").clone()
    }

    pub fn fail_next_save(&self, message: &str) {
        *self.fail_save.lock().expect("fail lock") = Some(message.to_string());
    }
}

impl ConfigService for ScriptedSettings {
    fn load(&self) -> Result<SettingsRecord, ServiceError> {
        Ok(self.remote())
    }

    fn save(&self, record: &SettingsRecord) -> Result<(), ServiceError> {
        if let Some(message) = self.fail_save.lock().expect("fail lock").take() {
            return Err(ServiceError::Validation { message });
        }
        *self.remote.lock().expect("remote lock") = record.clone();
        self.saves.lock().expect("saves lock").push(record.clone());
        Ok(())
    }
}

/// In-memory location history with the same back/forward/restore semantics as a browser tab.
pub struct HistoryHost {
    stack: RefCell<Vec<String>>,
    forward: RefCell<Vec<String>>,
    last_step: RefCell<Option<HistoryDirection>>,
    exit_warning: RefCell<bool>,
}

impl HistoryHost {
    pub fn at(path: &str) -> Self {
        Self {
            stack: RefCell::new(vec![path.to_string()]),
            forward: RefCell::new(Vec::new()),
            last_step: RefCell::new(None),
            exit_warning: RefCell::new(false),
        }
    }

    pub fn push(&self, path: &str) {
        self.stack.borrow_mut().push(path.to_string());
        self.forward.borrow_mut().clear();
    }

    /// User-initiated back: the location changes before anyone is told.
    pub fn user_back(&self) {
        if self.step_back() {
            *self.last_step.borrow_mut() = Some(HistoryDirection::Back);
        }
    }

    pub fn user_forward(&self) {
        if self.step_forward() {
            *self.last_step.borrow_mut() = Some(HistoryDirection::Forward);
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.stack.borrow().clone()
    }

    pub fn exit_warning(&self) -> bool {
        *self.exit_warning.borrow()
    }

    fn step_back(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.len() <= 1 {
            return false;
        }
        if let Some(path) = stack.pop() {
            self.forward.borrow_mut().push(path);
        }
        true
    }

    fn step_forward(&self) -> bool {
        let Some(path) = self.forward.borrow_mut().pop() else {
            return false;
        };
        self.stack.borrow_mut().push(path);
        true
    }
}

impl HostRuntime for HistoryHost {
    fn current_path(&self) -> String {
        self.stack.borrow().last().cloned().unwrap_or_default()
    }

    fn go_to(&self, target: &NavigationTarget) {
        self.push(&target.path());
    }

    fn go_back(&self) {
        self.step_back();
    }

    fn go_forward(&self) {
        self.step_forward();
    }

    fn restore_location(&self) {
        let last_step = self.last_step.borrow_mut().take();
        match last_step {
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
        *self.exit_warning.borrow_mut() = enabled;
    }
}

/// Fetcher whose responses the test delivers by hand, in any order.
#[derive(Default)]
pub struct ManualFetcher {
    pending: Mutex<Vec<(FetchTicket, Sender<FetchResponse>)>>,
}

impl ManualFetcher {
    pub fn tickets(&self) -> Vec<FetchTicket> {
        self.pending
            .lock()
            .expect("pending lock")
            .iter()
            .map(|(ticket, _)| ticket.clone())
            .collect()
    }

    pub fn respond(&self, index: usize, payload: FetchPayload) {
        let pending = self.pending.lock().expect("pending lock");
        let (ticket, tx) = &pending[index];
        let _ = tx.send(FetchResponse {
            token: ticket.token,
            result: Ok(payload),
        });
    }

    pub fn drop_worker(&self, index: usize) {
        let mut pending = self.pending.lock().expect("pending lock");
        pending.remove(index);
    }
}

impl SuggestionFetcher for ManualFetcher {
    fn spawn_fetch(&self, ticket: FetchTicket) -> Receiver<FetchResponse> {
        let (tx, rx) = mpsc::channel();
        self.pending
            .lock()
            .expect("pending lock")
            .push((ticket, tx));
        rx
    }
}

pub struct StaticSuggestions {
    pub entities: Vec<EntityHit>,
    pub tags: Vec<String>,
}

impl SuggestionService for StaticSuggestions {
    fn search_entities(
        &self,
        _text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<EntityHit>, ServiceError> {
        Ok(self.entities.iter().skip(offset).take(limit).cloned().collect())
    }

    fn search_tags(&self, _prefix: &str, limit: usize) -> Result<Vec<String>, ServiceError> {
        Ok(self.tags.iter().take(limit).cloned().collect())
    }
}

pub fn hit(id: u64, name: &str) -> EntityHit {
    EntityHit {
        id,
        name: name.to_string(),
    }
}

pub fn record(value: serde_json::Value) -> SettingsRecord {
    SettingsRecord::from_value(value).expect("object record")
}
