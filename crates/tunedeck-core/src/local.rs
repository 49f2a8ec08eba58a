//! File-backed implementations of the external services.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::SettingsRecord;
use crate::services::{ConfigService, EntityHit, ServiceError, SuggestionService};

/// Settings record stored as a JSON document. A missing file reads as an empty record.
#[derive(Debug, Clone)]
pub struct JsonFileConfigService {
    path: PathBuf,
}

impl JsonFileConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigService for JsonFileConfigService {
    fn load(&self) -> Result<SettingsRecord, ServiceError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "settings file missing, starting empty");
            return Ok(SettingsRecord::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| ServiceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|error| ServiceError::Parse {
                path: self.path.clone(),
                message: error.to_string(),
            })?;

        SettingsRecord::from_value(value).map_err(|error| ServiceError::Parse {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }

    fn save(&self, record: &SettingsRecord) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ServiceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut serialized = serde_json::to_string_pretty(&record.canonical_value()).map_err(
            |error| ServiceError::Validation {
                message: error.to_string(),
            },
        )?;
        serialized.push('\n');

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized).map_err(|source| ServiceError::Write {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| ServiceError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    artists: Vec<EntityHit>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Artist and tag catalog read from a TOML file, searched in file order.
#[derive(Debug, Clone, Default)]
pub struct CatalogSuggestionService {
    artists: Vec<EntityHit>,
    tags: Vec<String>,
}

impl CatalogSuggestionService {
    pub fn new(artists: Vec<EntityHit>, tags: Vec<String>) -> Self {
        Self { artists, tags }
    }

    pub fn artists(&self) -> &[EntityHit] {
        &self.artists
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

pub fn load_catalog(path: &Path) -> Result<CatalogSuggestionService, ServiceError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "catalog missing, suggestions disabled");
        return Ok(CatalogSuggestionService::default());
    }

    let raw = fs::read_to_string(path).map_err(|source| ServiceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: CatalogFile = toml::from_str(&raw).map_err(|error| ServiceError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    Ok(CatalogSuggestionService::new(parsed.artists, parsed.tags))
}

impl SuggestionService for CatalogSuggestionService {
    fn search_entities(
        &self,
        text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<EntityHit>, ServiceError> {
        let needle = text.trim().to_lowercase();
        Ok(self
            .artists
            .iter()
            .filter(|artist| artist.name.to_lowercase().contains(&needle))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn search_tags(&self, prefix: &str, limit: usize) -> Result<Vec<String>, ServiceError> {
        let needle = prefix.trim().to_lowercase();
        Ok(self
            .tags
            .iter()
            .filter(|tag| tag.to_lowercase().starts_with(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::{CatalogSuggestionService, JsonFileConfigService, load_catalog};
    use crate::record::SettingsRecord;
    use crate::services::{ConfigService, EntityHit, ServiceError, SuggestionService};

    #[test]
    fn missing_settings_file_loads_empty_record() {
        let temp = tempfile::tempdir().expect("temp dir");
        let service = JsonFileConfigService::new(temp.path().join("settings.json"));
        assert_eq!(service.load().expect("load"), SettingsRecord::new());
    }

    #[test]
    fn save_then_load_round_trips_and_sorts_keys() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("nested").join("settings.json");
        let service = JsonFileConfigService::new(&path);
        let record = SettingsRecord::from_value(json!({"b": {"y": 1, "x": 2}, "a": true}))
            .expect("record");

        service.save(&record).expect("save");
        assert_eq!(service.load().expect("load"), record);

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.find("\"a\"") < raw.find("\"b\""));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn non_object_settings_file_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("settings.json");
        fs::write(&path, "[1, 2]").expect("write");

        let error = JsonFileConfigService::new(&path)
            .load()
            .expect_err("load should fail");
        assert!(matches!(error, ServiceError::Parse { .. }));
    }

    #[test]
    fn catalog_loads_artists_and_tags() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
tags = ["rock", "Rockabilly", "jazz"]

[[artists]]
id = 1
name = "Motorhead"

[[artists]]
id = 2
name = "Motorpsycho"
"#,
        )
        .expect("write");

        let catalog = load_catalog(&path).expect("catalog");
        assert_eq!(catalog.artists().len(), 2);
        assert_eq!(
            catalog.search_tags("ROCK", 10).expect("tags"),
            vec!["rock".to_string(), "Rockabilly".to_string()]
        );
    }

    #[test]
    fn missing_catalog_is_empty() {
        let temp = tempfile::tempdir().expect("temp dir");
        let catalog = load_catalog(&temp.path().join("catalog.toml")).expect("catalog");
        assert!(catalog.search_entities("mo", 10, 0).expect("search").is_empty());
    }

    #[test]
    fn entity_search_pages_through_matches() {
        let catalog = CatalogSuggestionService::new(
            vec![
                EntityHit { id: 1, name: "Motorhead".to_string() },
                EntityHit { id: 2, name: "Blur".to_string() },
                EntityHit { id: 3, name: "Motorpsycho".to_string() },
                EntityHit { id: 4, name: "Electric Motor".to_string() },
            ],
            Vec::new(),
        );

        let first = catalog.search_entities("motor", 2, 0).expect("page one");
        let ids: Vec<_> = first.iter().map(|hit| hit.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let second = catalog.search_entities("motor", 2, 2).expect("page two");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, 4);
    }
}
