use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::DEFAULT_SETTLE_DELAY;
use crate::suggest::debounce::DEFAULT_QUIET_INTERVAL;
use crate::suggest::query::{DEFAULT_MIN_ENTITY_CHARS, DEFAULT_TAG_MARKER, QueryClassifier};
use crate::suggest::reconcile::{DEFAULT_ENTITY_CAP, DEFAULT_TAG_CAP};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TunedeckConfig {
    pub version: u32,
    pub editor: EditorConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

impl Default for TunedeckConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            editor: EditorConfig::default(),
            search: SearchConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub settle_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub quiet_interval_ms: u64,
    pub tag_marker: char,
    pub min_entity_chars: usize,
    pub entity_cap: usize,
    pub tag_cap: usize,
    pub entity_fetch_limit: usize,
    pub tag_fetch_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quiet_interval_ms: DEFAULT_QUIET_INTERVAL.as_millis() as u64,
            tag_marker: DEFAULT_TAG_MARKER,
            min_entity_chars: DEFAULT_MIN_ENTITY_CHARS,
            entity_cap: DEFAULT_ENTITY_CAP,
            tag_cap: DEFAULT_TAG_CAP,
            entity_fetch_limit: 12,
            tag_fetch_limit: 16,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub settings_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

impl TunedeckConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.editor.settle_delay_ms)
    }

    pub fn quiet_interval(&self) -> Duration {
        Duration::from_millis(self.search.quiet_interval_ms)
    }

    pub fn classifier(&self) -> QueryClassifier {
        QueryClassifier::new(self.search.tag_marker, self.search.min_entity_chars)
    }

    /// Settings record location; relative paths resolve against `config_dir`.
    pub fn settings_path(&self, config_dir: &Path) -> PathBuf {
        resolve_storage_path(
            config_dir,
            self.storage.settings_path.as_deref(),
            "settings.json",
        )
    }

    pub fn catalog_path(&self, config_dir: &Path) -> PathBuf {
        resolve_storage_path(
            config_dir,
            self.storage.catalog_path.as_deref(),
            "catalog.toml",
        )
    }
}

fn resolve_storage_path(config_dir: &Path, configured: Option<&Path>, fallback: &str) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => config_dir.join(path),
        None => config_dir.join(fallback),
    }
}

pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs.home_dir().join(".config").join("tunedeck"))
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    Ok(resolve_config_dir()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<TunedeckConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: TunedeckConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Missing file means defaults. A present file must parse and validate.
pub fn load_config_or_default(path: &Path) -> Result<TunedeckConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(TunedeckConfig::default());
    }
    load_config(path)
}

pub fn validate_config(config: &TunedeckConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("version must be {CONFIG_VERSION}"),
        });
    }

    let non_zero = [
        ("editor.settle_delay_ms", config.editor.settle_delay_ms as usize),
        ("search.quiet_interval_ms", config.search.quiet_interval_ms as usize),
        ("search.min_entity_chars", config.search.min_entity_chars),
        ("search.entity_cap", config.search.entity_cap),
        ("search.tag_cap", config.search.tag_cap),
        ("search.entity_fetch_limit", config.search.entity_fetch_limit),
        ("search.tag_fetch_limit", config.search.tag_fetch_limit),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            return Err(ConfigError::Validation {
                message: format!("{name} must be greater than zero"),
            });
        }
    }

    if config.search.tag_marker.is_whitespace() || config.search.tag_marker.is_alphanumeric() {
        return Err(ConfigError::Validation {
            message: "search.tag_marker must be a symbol character".to_string(),
        });
    }

    if config.search.entity_fetch_limit < config.search.entity_cap {
        return Err(ConfigError::Validation {
            message: "search.entity_fetch_limit must be at least search.entity_cap".to_string(),
        });
    }

    if config.search.tag_fetch_limit < config.search.tag_cap {
        return Err(ConfigError::Validation {
            message: "search.tag_fetch_limit must be at least search.tag_cap".to_string(),
        });
    }

    Ok(())
}
