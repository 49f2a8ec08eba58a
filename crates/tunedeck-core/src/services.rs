use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::SettingsRecord;

pub type EntityId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHit {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("not authorized: {message}")]
    Unauthorized { message: String },
    #[error("rejected by backend: {message}")]
    Validation { message: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Source of truth for the settings record.
pub trait ConfigService {
    fn load(&self) -> Result<SettingsRecord, ServiceError>;

    /// Persists the whole record. Implementations must not apply it partially.
    fn save(&self, record: &SettingsRecord) -> Result<(), ServiceError>;
}

pub trait SuggestionService: Send + Sync {
    fn search_entities(
        &self,
        text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<EntityHit>, ServiceError>;

    fn search_tags(&self, prefix: &str, limit: usize) -> Result<Vec<String>, ServiceError>;
}
