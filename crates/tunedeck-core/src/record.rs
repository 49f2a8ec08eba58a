use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("settings record must be a JSON object")]
    NotAnObject,
    #[error("settings path must be non-empty")]
    EmptyPath,
    #[error("cannot descend into '{segment}' while setting '{path}': value is not an object")]
    PathConflict { path: String, segment: String },
}

/// Nested settings record: string keys mapping to scalars, arrays or nested objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(Map<String, Value>);

impl SettingsRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets the value at a dotted path, creating intermediate objects as needed.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), RecordError> {
        if path.trim().is_empty() {
            return Err(RecordError::EmptyPath);
        }

        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = segments.split_last().ok_or(RecordError::EmptyPath)?;

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = entry
                .as_object_mut()
                .ok_or_else(|| RecordError::PathConflict {
                    path: path.to_string(),
                    segment: (*segment).to_string(),
                })?;
        }

        current.insert((*last).to_string(), value);
        Ok(())
    }

    pub fn with_value(&self, path: &str, value: Value) -> Result<Self, RecordError> {
        let mut next = self.clone();
        next.set(path, value)?;
        Ok(next)
    }

    /// Leaf entries as dotted paths in sorted key order. Arrays and empty objects are leaves.
    pub fn flatten(&self) -> Vec<(String, Value)> {
        let mut rows = Vec::new();
        flatten_into(&self.0, "", &mut rows);
        rows
    }

    /// Copy of the record with every object's keys in sorted order.
    pub fn canonical_value(&self) -> Value {
        canonicalize(&Value::Object(self.0.clone()))
    }

    pub fn canonical_json(&self) -> String {
        self.canonical_value().to_string()
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, rows: &mut Vec<(String, Value)>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    for key in keys {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match &map[key] {
            Value::Object(child) if !child.is_empty() => flatten_into(child, &path, rows),
            other => rows.push((path, other.clone())),
        }
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

pub fn default_settings() -> SettingsRecord {
    let value = json!({
        "profile": {
            "display_name": "",
            "public": false,
        },
        "library": {
            "sort": "artist",
            "show_compilations": true,
        },
        "playback": {
            "crossfade_seconds": 0,
            "normalize_volume": false,
        },
        "notifications": {
            "email": true,
            "new_releases": true,
        },
    });

    match value {
        Value::Object(map) => SettingsRecord(map),
        _ => SettingsRecord::new(),
    }
}

/// Fills fields missing from `record` with their defaults. Present values are never replaced.
/// Returns the number of fields that were filled.
pub fn fill_defaults(record: &mut SettingsRecord) -> usize {
    merge_missing(&mut record.0, &default_settings().0)
}

pub fn with_defaults(record: &SettingsRecord) -> SettingsRecord {
    let mut filled = record.clone();
    fill_defaults(&mut filled);
    filled
}

fn merge_missing(target: &mut Map<String, Value>, defaults: &Map<String, Value>) -> usize {
    let mut filled = 0;
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
                filled += count_leaves(default);
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(default_map) = default {
                    filled += merge_missing(existing, default_map);
                }
            }
            Some(_) => {}
        }
    }
    filled
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) if !map.is_empty() => map.values().map(count_leaves).sum(),
        _ => 1,
    }
}
